//! Personal-name splitting.

/// A name split into given, middle and family parts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonName {
    pub first: String,
    pub middle: String,
    pub last: String,
}

/// Split a full name into its parts.
///
/// The first token is the given name and the last token the family name.
/// Remaining tokens are middle names, except that tokens found in
/// `surname_prefixes` (checked from the last middle token backwards)
/// are moved to the front of the family name.
pub fn split_name(full_name: &str, surname_prefixes: &[String]) -> PersonName {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();

    let (first, rest) = match tokens.split_first() {
        Some((first, rest)) => (*first, rest),
        None => return PersonName::default(),
    };
    let Some((last, middle)) = rest.split_last() else {
        return PersonName {
            first: first.to_string(),
            ..PersonName::default()
        };
    };

    let mut family = vec![*last];
    let mut middle_names = Vec::with_capacity(middle.len());
    for token in middle.iter().rev() {
        if surname_prefixes.iter().any(|p| p.as_str() == *token) {
            family.push(*token);
        } else {
            middle_names.push(*token);
        }
    }
    family.reverse();
    middle_names.reverse();

    PersonName {
        first: first.to_string(),
        middle: middle_names.join(" "),
        last: family.join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prefixes_join_family_name() {
        let name = split_name("Jan Van Der Berg", &prefixes(&["Van", "Der"]));
        assert_eq!(name.first, "Jan");
        assert_eq!(name.middle, "");
        assert_eq!(name.last, "Van Der Berg");
    }

    #[test]
    fn test_unlisted_particle_stays_middle() {
        let name = split_name("Jan Van Der Berg", &prefixes(&["Van"]));
        assert_eq!(name.middle, "Der");
        assert_eq!(name.last, "Van Berg");
    }

    #[test]
    fn test_middle_names() {
        let name = split_name("Thabo Sipho John Mokoena", &prefixes(&["Van"]));
        assert_eq!(name.first, "Thabo");
        assert_eq!(name.middle, "Sipho John");
        assert_eq!(name.last, "Mokoena");
    }

    #[test]
    fn test_two_tokens() {
        let name = split_name("Jane Doe", &[]);
        assert_eq!(name.first, "Jane");
        assert_eq!(name.middle, "");
        assert_eq!(name.last, "Doe");
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(
            split_name("Madonna", &[]),
            PersonName {
                first: "Madonna".into(),
                ..PersonName::default()
            }
        );
        assert_eq!(split_name("   ", &[]), PersonName::default());
    }
}
