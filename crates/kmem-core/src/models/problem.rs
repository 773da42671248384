//! RFC 7807 problem details returned on error statuses.

use std::fmt;

use crate::optional::Optional;
use crate::wire_model;

wire_model! {
    /// Error body. Unknown keys (validation `errors`, `traceId`, ...) are kept.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ProblemDetails {
        pub problem_type: Optional<String> => "type",
        pub title: Optional<String> => "title",
        pub status: Optional<i64> => "status",
        pub detail: Optional<String> => "detail",
        pub instance: Optional<String> => "instance",
        ; extra additional
    }
}

impl fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Optional::Present(status) = &self.status {
            write!(f, "{} ", status)?;
        }
        f.write_str(self.title.present().map(String::as_str).unwrap_or("Problem"))?;
        if let Optional::Present(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, OpenModel};
    use serde_json::json;

    #[test]
    fn test_problem_keeps_unknown_fields() {
        let wire = json!({
            "type": "https://tools.ietf.org/html/rfc7231#section-6.5.1",
            "title": "Bad Request",
            "status": 400,
            "detail": "Index name is invalid",
            "traceId": "00-abc-01",
            "errors": {"index": ["too long"]}
        });
        let problem = ProblemDetails::decode(wire.clone()).unwrap();

        assert_eq!(problem.status, Optional::Present(400));
        assert_eq!(problem.keys(), vec!["traceId".to_string(), "errors".to_string()]);
        assert!(!problem.contains("type"));
        assert_eq!(problem.encode(), wire);
    }

    #[test]
    fn test_display() {
        let problem = ProblemDetails {
            title: Optional::Present("Unauthorized".to_string()),
            status: Optional::Present(401),
            detail: Optional::Present("Missing token".to_string()),
            ..Default::default()
        };
        assert_eq!(problem.to_string(), "401 Unauthorized: Missing token");
        assert_eq!(ProblemDetails::default().to_string(), "Problem");
    }

    #[test]
    fn test_type_maps_to_problem_type() {
        assert_eq!(ProblemDetails::wire_name("problem_type"), Some("type"));
        assert_eq!(ProblemDetails::ident_for("type"), Some("problem_type"));
    }
}
