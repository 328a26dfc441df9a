use crate::model::post::{PostDraft, PostKind};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Validate, Serialize, Deserialize, Debug)]
pub struct CredentialsForm {
    #[validate(length(min = 1, max = 32, message = "username must be 1 to 32 characters long"))]
    #[validate(custom = "validate_username")]
    pub username: String,

    #[validate(length(min = 1, message = "password is required"))]
    #[validate(custom = "validate_password")]
    pub password: String,
}

#[derive(Validate, Serialize, Deserialize, Debug)]
#[validate(schema(function = "validate_post_body", skip_on_field_errors = false))]
pub struct PostForm {
    #[serde(rename = "type")]
    pub kind: PostKind,

    #[validate(length(min = 1, max = 100, message = "title must be 1 to 100 characters long"))]
    pub title: String,

    #[validate(length(min = 1, max = 300, message = "category must be 1 to 300 characters long"))]
    pub category: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub text: Option<String>,
}

impl PostForm {
    pub fn into_draft(self) -> PostDraft {
        PostDraft {
            kind: self.kind,
            title: self.title,
            url: self.url,
            category: self.category,
            text: self.text,
        }
    }
}

#[derive(Validate, Serialize, Deserialize, Debug)]
pub struct CommentForm {
    #[serde(rename = "comment")]
    #[validate(length(min = 1, max = 1000, message = "comment must be 1 to 1000 characters long"))]
    pub body: String,
}

/// Flattens validator output into client-facing messages, ordered by field.
pub fn from_validation_errors(e: ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = e.field_errors().into_iter().collect();
    fields.sort_by_key(|(name, _)| *name);
    fields
        .into_iter()
        .flat_map(|(name, errors)| {
            errors.iter().map(move |item| match item.message.as_ref() {
                Some(s) => s.to_string(),
                None => format!("{} is invalid", name),
            })
        })
        .collect()
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError {
        code: Cow::from(code),
        message: Some(Cow::from(message)),
        params: Default::default(),
    }
}

fn validate_username(s: &str) -> Result<(), ValidationError> {
    if s.contains(char::is_whitespace) {
        return Err(error("white_space", "username must not contain whitespace"));
    }
    Ok(())
}

fn validate_password(s: &str) -> Result<(), ValidationError> {
    if s.contains(char::is_whitespace) {
        return Err(error("white_space", "password must not contain whitespace"));
    }
    Ok(())
}

fn validate_post_body(form: &PostForm) -> Result<(), ValidationError> {
    match form.kind {
        PostKind::Text => match form.text.as_deref() {
            Some(t) if !t.is_empty() => Ok(()),
            _ => Err(error("text", "text is required for text posts")),
        },
        PostKind::Link => match form.url.as_deref() {
            Some(u) if u.starts_with("http://") || u.starts_with("https://") => Ok(()),
            _ => Err(error("url", "a valid http(s) url is required for link posts")),
        },
    }
}
