//! Unit tests for the identifiers module

use core_kernel::{LoanId, ValuationId};
use uuid::Uuid;

mod loan_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = LoanId::new();
        let id2 = LoanId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_generates_time_ordered_ids() {
        let id1 = LoanId::new();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = LoanId::new();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = LoanId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_display_format() {
        let id = LoanId::new();
        assert!(id.to_string().starts_with("LN-"));
    }

    #[test]
    fn test_from_str_with_prefix() {
        let original = LoanId::new();
        let parsed: LoanId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("not-a-uuid".parse::<LoanId>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id = LoanId::new();
        let json = serde_json::to_string(&id).unwrap();
        // Serialized as a bare UUID string, no prefix
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        let back: LoanId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}

mod valuation_id_tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let id = ValuationId::new();
        assert!(id.to_string().starts_with("VAL-"));
    }

    #[test]
    fn test_distinct_types_share_no_equality() {
        let uuid = Uuid::new_v4();
        let loan_id = LoanId::from_uuid(uuid);
        let valuation_id = ValuationId::from_uuid(uuid);
        // Same backing UUID, but the display forms differ by prefix
        assert_ne!(loan_id.to_string(), valuation_id.to_string());
    }
}
