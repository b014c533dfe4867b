//! JMA tide-station symbol → place name lookup.
//!
//! The JMA suisan service addresses each station by a short symbol
//! (the `<station>.txt` part of the URL). The feed only needs the
//! human-readable place name for the calendar title, so this is a
//! plain static table consumed as-is. An unknown symbol is not an
//! error: the serving layer falls back to the raw symbol and produces
//! a degraded calendar name.

/// Place name for a JMA station symbol, if known.
pub fn place_for(station: &str) -> Option<&'static str> {
    let place = match station {
        "KR" => "釧路",
        "HK" => "函館",
        "TK" => "東京",
        "YK" => "横浜",
        "CS" => "銚子",
        "NG" => "名古屋",
        "OS" => "大阪",
        "KB" => "神戸",
        "HS" => "広島",
        "SM" => "下関",
        "NS" => "長崎",
        "KG" => "鹿児島",
        "NH" => "那覇",
        "IS" => "石垣",
        _ => return None,
    };
    Some(place)
}
