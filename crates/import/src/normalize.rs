/// Characters trimmed from both ends of a candidate name.
fn is_edge_noise(c: char) -> bool {
    matches!(c, '*' | '#' | '-') || c.is_whitespace()
}

/// Canonical form of a company name: edge `*`, `#`, `-` and spaces removed,
/// then every whitespace-separated word title-cased.
pub fn normalize_company_name(name: &str) -> String {
    title_case(name.trim_matches(is_edge_noise))
}

/// Uppercase the first letter of each word and lowercase the rest.
///
/// Only the first character of an uppercase expansion stays uppercase
/// (`ß` becomes `Ss`), so the result is stable under a second pass.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            let Some(first) = chars.next() else {
                return String::new();
            };
            let mut upper = first.to_uppercase();
            let head = upper.next();
            head.into_iter()
                .chain(upper.chain(chars).flat_map(char::to_lowercase))
                .collect()
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_edge_noise() {
        assert_eq!(normalize_company_name("*DON JULIOS-"), "Don Julios");
        assert_eq!(normalize_company_name("## ACME # "), "Acme");
        assert_eq!(normalize_company_name("- -"), "");
    }

    #[test]
    fn keeps_inner_punctuation() {
        assert_eq!(normalize_company_name("WAL-MART"), "Wal-mart");
        assert_eq!(normalize_company_name("mcdonald's"), "Mcdonald's");
        assert_eq!(normalize_company_name("AMAZON.COM*MKTP"), "Amazon.com*mktp");
    }

    #[test]
    fn title_cases_each_word() {
        assert_eq!(title_case("angie MENESES bustamante"), "Angie Meneses Bustamante");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn handles_non_ascii() {
        assert_eq!(normalize_company_name("PANADERÍA LA ÚNICA"), "Panadería La Única");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["*TST*DON JULIOS-", "zelle", "  Blue Bottle Oakland ", "#", "Angie Meneses", "ßar", "STRAßE ǆungla"] {
            let once = normalize_company_name(raw);
            assert_eq!(normalize_company_name(&once), once);
        }
    }

    #[test]
    fn multi_char_uppercase_keeps_only_the_first_capital() {
        assert_eq!(normalize_company_name("ßar"), "Ssar");
        assert_eq!(normalize_company_name("Ssar"), "Ssar");
    }

    #[test]
    fn already_normalized_is_unchanged() {
        assert_eq!(normalize_company_name("Don Julios"), "Don Julios");
    }
}
