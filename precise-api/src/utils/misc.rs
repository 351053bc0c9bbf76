/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A word starts at any letter not preceded by another letter, so
/// `"o'neil"` becomes `"O'Neil"`.
pub fn title_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut previous_is_letter = false;

    for c in input.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}
