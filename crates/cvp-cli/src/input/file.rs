use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON or YAML file (chosen by extension) into a typed struct.
pub fn read_structured<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let is_yaml = matches!(
        canonical.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let value: T = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    Ok(value)
}

/// Resolve and validate the path.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvp_core::form::FormSubmission;
    use std::io::Write;

    #[test]
    fn test_reads_yaml_submission() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            "company_name: Acme\nfixed_cost: \"200\"\nproducts:\n  - name: A\n    selling_price: \"100\"\n    variable_cost: \"40\"\nsupplier:\n  standard_price: \"10\"\n  actual_price: \"12\"\n  actual_quantity: \"100\"\n"
        )
        .unwrap();

        let sub: FormSubmission = read_structured(file.path().to_str().unwrap()).unwrap();
        assert_eq!(sub.company_name, "Acme");
        assert_eq!(sub.products.len(), 1);
    }

    #[test]
    fn test_missing_file_reported() {
        let err = read_structured::<FormSubmission>("/no/such/submission.json").unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }
}
