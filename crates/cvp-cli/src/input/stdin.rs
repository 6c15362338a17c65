use serde_json::Value;
use std::io::{self, Read};

/// Read a piped submission from stdin, as JSON or else YAML.
/// Returns None when stdin is a TTY or carries nothing.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped(buffer: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map(Some)
            .map_err(|_| format!("stdin is neither JSON nor YAML: {}", json_err).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_none() {
        assert!(parse_piped("  \n").unwrap().is_none());
    }

    #[test]
    fn test_json_and_yaml_accepted() {
        let json = parse_piped(r#"{"company_name": "Acme"}"#).unwrap().unwrap();
        let yaml = parse_piped("company_name: Acme\n").unwrap().unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_piped("{ not: [valid").is_err());
    }
}
