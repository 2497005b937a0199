//! Static agronomy notes shown next to a recommendation.

pub const UNKNOWN_SEASON: &str = "Season info not available";
pub const UNKNOWN_REASON_KN: &str = "ಈ ಬೆಳೆಗೆ ಕಾರಣ ಲಭ್ಯವಿಲ್ಲ";

/// Typical sowing to harvest window for a crop.
pub fn crop_season(crop: &str) -> &'static str {
    match crop {
        "Cotton" => "June to October",
        "Ragi" => "July to November",
        "Paddy" => "June to September",
        "Wheat" => "November to March",
        "Maize" => "June to October",
        "Sugarcane" => "December to January",
        "Sunflower" => "August to December",
        _ => UNKNOWN_SEASON,
    }
}

/// Short rationale in Kannada for why a crop fits.
pub fn crop_reason_kn(crop: &str) -> &'static str {
    match crop {
        "Cotton" => "ಇದು ಬ್ಲಾಕ್ ಮಣ್ಣಿನಲ್ಲಿ ಉತ್ತಮವಾಗಿ ಬೆಳೆಯುತ್ತದೆ ಮತ್ತು ಕಡಿಮೆ ತೇವಾಂಶಕ್ಕೆ ತಕ್ಕದ್ದು.",
        "Ragi" => "ಇದು ಕಡಿಮೆ ನೀರಿನಲ್ಲಿ ಬೆಳೆಯುತ್ತದೆ ಮತ್ತು ಹೆಚ್ಚು ಹಾರ್ವೆಸ್ಟ್ ಲಭಿಸುತ್ತದೆ.",
        "Paddy" => "ಹೆಚ್ಚು ತೇವಾಂಶ ಮತ್ತು ಮಣ್ಣಿನ ನಾರ್ಮಿಕತೆಯೊಂದಿಗೆ ಉತ್ತಮ ಬೆಳೆಯುತ್ತದೆ.",
        "Wheat" => "ಇದು ಶೀತಕಾಲದಲ್ಲಿ ಬೆಳೆಯುತ್ತದೆ ಮತ್ತು ಉಷ್ಣತೆ ಕಡಿಮೆ ಇದ್ದಾಗ ಸೂಕ್ತವಾಗಿದೆ.",
        "Maize" => "ಇದು ತಾತ್ಕಾಲಿಕ ಮಳೆಯ ಜೊತೆಗೆ ಉತ್ತಮವಾಗಿ ಬೆಳೆದು ನಬ್ದ ಲಾಭ ಕೊಡುತ್ತದೆ.",
        "Sugarcane" => "ಇದು ಉಷ್ಣ ಮಣ್ಣು ಮತ್ತು ನೀರಿನ ಸಾಕಷ್ಟು ಲಭ್ಯತೆ ಇದ್ದಾಗ ಉತ್ತಮವಾಗಿದೆ.",
        "Sunflower" => "ಇದು ಉಷ್ಣತೆಯೊಂದಿಗೆ ಬೆಳೆಯುತ್ತದೆ ಮತ್ತು ಕಡಿಮೆ ಹರವೆ ಬೇಕಾದ ಬೆಳೆಯಾಗಿದೆ.",
        _ => UNKNOWN_REASON_KN,
    }
}
