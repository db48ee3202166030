/// Map a BCP-47 style language hint to a Tesseract traineddata code.
/// Returns None for hints with no known mapping.
pub fn tesseract_code(hint: &str) -> Option<&'static str> {
    let tag = hint.trim().to_lowercase().replace('_', "-");

    match tag.as_str() {
        "zh-hant" | "zh-tw" | "zh-hk" | "chi_tra" => return Some("chi_tra"),
        "zh" | "zh-hans" | "zh-cn" | "zh-sg" | "chi_sim" => return Some("chi_sim"),
        _ => {}
    }

    let primary = tag.split('-').next()?;
    match primary {
        "en" | "eng" => Some("eng"),
        "ja" | "jpn" => Some("jpn"),
        "ko" | "kor" => Some("kor"),
        "fr" | "fra" => Some("fra"),
        "de" | "deu" => Some("deu"),
        "es" | "spa" => Some("spa"),
        "it" | "ita" => Some("ita"),
        "pt" | "por" => Some("por"),
        "ru" | "rus" => Some("rus"),
        "nl" | "nld" => Some("nld"),
        "ar" | "ara" => Some("ara"),
        "hi" | "hin" => Some("hin"),
        _ => None,
    }
}

/// Build the `+`-joined Tesseract language string for an ordered hint list.
///
/// Unknown three-letter codes pass through so installed traineddata not in the
/// table is still usable. Duplicates are dropped, first occurrence wins.
pub fn tesseract_languages(hints: &[String]) -> String {
    let mut codes: Vec<String> = Vec::new();

    for hint in hints {
        let code = match tesseract_code(hint) {
            Some(code) => code.to_string(),
            None => {
                let raw = hint.trim().to_lowercase();
                if raw.len() == 3 && raw.chars().all(|c| c.is_ascii_lowercase()) {
                    raw
                } else {
                    tracing::debug!(hint = %hint, "No Tesseract model for language hint");
                    continue;
                }
            }
        };

        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    if codes.is_empty() {
        "eng".to_string()
    } else {
        codes.join("+")
    }
}
