pub mod file;
pub mod stdin;

use cvp_core::form::FormSubmission;

/// Read a form submission from `--input <file>` or piped stdin.
pub fn read_submission(path: Option<&str>) -> Result<FormSubmission, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_structured(path)
    } else if let Some(data) = stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input <file.json|file.yaml> or stdin required".into())
    }
}
