//! Back-office request bodies for the content tables.

use institute_db::entities::{
    Blog, Course, Faculty, Faq, Placement, Testimonial, blog, course, course::Difficulty, faculty,
    faq, placement, testimonial,
};
use sea_orm::{ActiveValue::NotSet, Set};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::content::ContentForm;

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// URL-safe slug: lowercase ASCII words joined by single dashes.
#[must_use]
pub fn slugify(raw: &str) -> String {
    raw.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn validate_course(form: &CourseForm) -> Result<(), ValidationError> {
    if form.discount.unwrap_or(0) > form.fees {
        return Err(ValidationError::new("discount")
            .with_message("Discount cannot exceed the course fees".into()));
    }
    Ok(())
}

/// Course create/replace body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_course"))]
pub struct CourseForm {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub fees: i64,
    #[validate(range(min = 0))]
    pub discount: Option<i64>,
    pub category_id: Option<String>,
    pub difficulty: Difficulty,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl ContentForm for CourseForm {
    type Entity = Course;
    type ActiveModel = course::ActiveModel;

    fn into_active_model(self) -> course::ActiveModel {
        course::ActiveModel {
            id: NotSet,
            title: Set(self.title.trim().to_string()),
            description: Set(trimmed(self.description)),
            fees: Set(self.fees),
            discount: Set(self.discount),
            category_id: Set(trimmed(self.category_id)),
            difficulty: Set(self.difficulty),
            image_url: Set(trimmed(self.image_url)),
            is_public: NotSet,
            is_featured: NotSet,
            created_at: NotSet,
        }
    }

    fn category_id(&self) -> Option<&str> {
        self.category_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Blog post create/replace body. The slug is derived from the title when
/// not given.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogForm {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[validate(length(max = 256))]
    pub slug: Option<String>,
    #[validate(length(max = 1000))]
    pub excerpt: Option<String>,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl ContentForm for BlogForm {
    type Entity = Blog;
    type ActiveModel = blog::ActiveModel;

    fn into_active_model(self) -> blog::ActiveModel {
        let slug = self
            .slug
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&self.title));

        blog::ActiveModel {
            id: NotSet,
            title: Set(self.title.trim().to_string()),
            slug: Set(slug),
            excerpt: Set(trimmed(self.excerpt)),
            content: Set(self.content),
            image_url: Set(trimmed(self.image_url)),
            author_id: NotSet,
            is_public: NotSet,
            is_featured: NotSet,
            created_at: NotSet,
        }
    }

    fn stamp_author(model: &mut blog::ActiveModel, author_id: &str) {
        model.author_id = Set(Some(author_id.to_string()));
    }
}

/// Testimonial create/replace body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialForm {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(max = 128))]
    pub designation: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl ContentForm for TestimonialForm {
    type Entity = Testimonial;
    type ActiveModel = testimonial::ActiveModel;

    fn into_active_model(self) -> testimonial::ActiveModel {
        testimonial::ActiveModel {
            id: NotSet,
            name: Set(self.name.trim().to_string()),
            designation: Set(trimmed(self.designation)),
            message: Set(self.message.trim().to_string()),
            image_url: Set(trimmed(self.image_url)),
            is_public: NotSet,
            is_featured: NotSet,
            created_at: NotSet,
        }
    }
}

/// Placement record create/replace body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlacementForm {
    #[validate(length(min = 1, max = 128))]
    pub student_name: String,
    #[validate(length(min = 1, max = 128))]
    pub company: String,
    #[validate(length(max = 128))]
    pub designation: Option<String>,
    #[validate(length(max = 64))]
    pub package: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl ContentForm for PlacementForm {
    type Entity = Placement;
    type ActiveModel = placement::ActiveModel;

    fn into_active_model(self) -> placement::ActiveModel {
        placement::ActiveModel {
            id: NotSet,
            student_name: Set(self.student_name.trim().to_string()),
            company: Set(self.company.trim().to_string()),
            designation: Set(trimmed(self.designation)),
            package: Set(trimmed(self.package)),
            image_url: Set(trimmed(self.image_url)),
            is_public: NotSet,
            is_featured: NotSet,
            created_at: NotSet,
        }
    }
}

/// FAQ create/replace body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FaqForm {
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[validate(length(min = 1, max = 5000))]
    pub answer: String,
}

impl ContentForm for FaqForm {
    type Entity = Faq;
    type ActiveModel = faq::ActiveModel;

    fn into_active_model(self) -> faq::ActiveModel {
        faq::ActiveModel {
            id: NotSet,
            question: Set(self.question.trim().to_string()),
            answer: Set(self.answer.trim().to_string()),
            is_public: NotSet,
            created_at: NotSet,
        }
    }
}

/// Faculty profile create/replace body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FacultyForm {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(max = 128))]
    pub designation: Option<String>,
    #[validate(length(max = 5000))]
    pub bio: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl ContentForm for FacultyForm {
    type Entity = Faculty;
    type ActiveModel = faculty::ActiveModel;

    fn into_active_model(self) -> faculty::ActiveModel {
        faculty::ActiveModel {
            id: NotSet,
            name: Set(self.name.trim().to_string()),
            designation: Set(trimmed(self.designation)),
            bio: Set(trimmed(self.bio)),
            image_url: Set(trimmed(self.image_url)),
            is_public: NotSet,
            is_featured: NotSet,
            created_at: NotSet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Rust for Beginners!"), "rust-for-beginners");
        assert_eq!(slugify("  C++ & DSA -- 2025 "), "c-dsa-2025");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_blog_slug_falls_back_to_title() {
        let form = BlogForm {
            title: "Why Learn SQL".to_string(),
            slug: Some("  ".to_string()),
            excerpt: None,
            content: "<p>Because.</p>".to_string(),
            image_url: None,
        };
        let model = form.into_active_model();
        assert_eq!(model.slug, ActiveValue::Set("why-learn-sql".to_string()));
        assert_eq!(model.author_id, ActiveValue::NotSet);
    }

    #[test]
    fn test_discount_above_fees_is_invalid() {
        let form = CourseForm {
            title: "Java".to_string(),
            description: None,
            fees: 5_000,
            discount: Some(6_000),
            category_id: None,
            difficulty: Difficulty::Beginner,
            image_url: None,
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_blank_category_is_no_category() {
        let form = CourseForm {
            title: "Java".to_string(),
            description: None,
            fees: 5_000,
            discount: None,
            category_id: Some(" ".to_string()),
            difficulty: Difficulty::Beginner,
            image_url: None,
        };
        assert_eq!(form.category_id(), None);
    }
}
