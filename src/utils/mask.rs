/// Hides all but the last four characters of a mobile number.
pub fn mask_mobile(mobile_number: &str) -> String {
    let visible: Vec<char> = mobile_number.chars().rev().take(4).collect();
    format!("***{}", visible.into_iter().rev().collect::<String>())
}
