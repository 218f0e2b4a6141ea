/// Format whole currency units with thousands separators: ₹1,234 / -₹500
pub fn money(val: i64, symbol: &str) -> String {
    let digits = val.unsigned_abs().to_string();

    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if val < 0 {
        format!("-{symbol}{with_commas}")
    } else {
        format!("{symbol}{with_commas}")
    }
}
