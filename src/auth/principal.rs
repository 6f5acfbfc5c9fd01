/// The authenticated dashboard administrator behind a request.
#[derive(Clone, Debug, PartialEq)]
pub struct Principal {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl Principal {
    pub fn dev() -> Self {
        Self {
            uid: "dev-bypass".to_string(),
            email: None,
            display_name: Some("Developer".to_string()),
        }
    }
}
