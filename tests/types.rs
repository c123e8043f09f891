// ABOUTME: Integration tests for type-safe identifiers and validated types.
// ABOUTME: Tests image name validation and identifier behavior.

use image_retention::types::*;

mod image_name_tests {
    use super::*;

    #[test]
    fn accepts_typical_names() {
        for name in ["ubuntu-22.04-base", "CentOS Stream 9", "win2022_gold", "a"] {
            let parsed = ImageName::new(name).unwrap();
            assert_eq!(parsed.as_str(), name);
            assert_eq!(parsed.to_string(), name);
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(ImageName::new(""), Err(ImageNameError::Empty)));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let name = "x".repeat(MAX_IMAGE_NAME_LEN + 1);
        assert!(matches!(ImageName::new(&name), Err(ImageNameError::TooLong)));

        let name = "x".repeat(MAX_IMAGE_NAME_LEN);
        assert!(ImageName::new(&name).is_ok());
    }

    #[test]
    fn surrounding_whitespace_is_rejected() {
        assert!(ImageName::new(" base").is_err());
        assert!(ImageName::new("base\t").is_err());
    }

    #[test]
    fn control_characters_are_rejected() {
        assert!(matches!(
            ImageName::new("ba\u{7}se"),
            Err(ImageNameError::ControlChar('\u{7}'))
        ));
    }

    #[test]
    fn matching_is_exact() {
        let name = ImageName::new("base").unwrap();
        assert!(name.matches("base"));
        assert!(!name.matches("Base"));
        assert!(!name.matches("base-2"));
        assert!(!name.matches("bas"));
    }
}

mod id_tests {
    use super::*;

    #[test]
    fn ids_compare_by_value() {
        let a = ImageId::new("a1");
        let b = ImageId::new("b2");
        assert!(a < b);
        assert_eq!(a, ImageId::new("a1"));
        assert_eq!(a.as_str(), "a1");
        assert_eq!(b.into_inner(), "b2");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ProjectId::new("p-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"p-42\"");

        let back: ProjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
