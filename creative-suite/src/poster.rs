//! Advertisement poster form: categories, validation and prompt composition.

use std::fmt;
use std::str::FromStr;

use creative_suite_types::content::Part;

use crate::error::{Error, Result};
use crate::media::ImagePayload;

/// 海报类别，顺序即展示顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PosterCategory {
    #[default]
    School,
    Ngo,
    Hospital,
    GroceryStore,
    Hostel,
    Hotel,
    CorporateEvent,
    MusicConcert,
    Restaurant,
}

impl PosterCategory {
    pub const ALL: [Self; 9] = [
        Self::School,
        Self::Ngo,
        Self::Hospital,
        Self::GroceryStore,
        Self::Hostel,
        Self::Hotel,
        Self::CorporateEvent,
        Self::MusicConcert,
        Self::Restaurant,
    ];

    /// 展示名称（也是 prompt 中使用的名称）。
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::School => "School",
            Self::Ngo => "NGO",
            Self::Hospital => "Hospital",
            Self::GroceryStore => "Grocery Store",
            Self::Hostel => "Hostel",
            Self::Hotel => "Hotel",
            Self::CorporateEvent => "Corporate Event",
            Self::MusicConcert => "Music Concert",
            Self::Restaurant => "Restaurant",
        }
    }
}

impl fmt::Display for PosterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PosterCategory {
    type Err = Error;

    /// 不区分大小写地匹配展示名称。
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::Parse {
                message: format!("unknown poster category: {wanted}"),
            })
    }
}

/// 海报表单。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosterRequest {
    pub category: PosterCategory,
    pub organization_name: String,
    pub director_name: String,
    pub team_members: String,
    pub topic: String,
    pub subtopic: String,
    pub description: String,
    pub achievements: String,
    pub logo: Option<ImagePayload>,
    pub extra_image: Option<ImagePayload>,
}

impl PosterRequest {
    /// 以三个必填字段创建表单。
    pub fn new(
        organization_name: impl Into<String>,
        topic: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            organization_name: organization_name.into(),
            topic: topic.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn category(mut self, category: PosterCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn director_name(mut self, value: impl Into<String>) -> Self {
        self.director_name = value.into();
        self
    }

    #[must_use]
    pub fn team_members(mut self, value: impl Into<String>) -> Self {
        self.team_members = value.into();
        self
    }

    #[must_use]
    pub fn subtopic(mut self, value: impl Into<String>) -> Self {
        self.subtopic = value.into();
        self
    }

    #[must_use]
    pub fn achievements(mut self, value: impl Into<String>) -> Self {
        self.achievements = value.into();
        self
    }

    #[must_use]
    pub fn logo(mut self, logo: ImagePayload) -> Self {
        self.logo = Some(logo);
        self
    }

    #[must_use]
    pub fn extra_image(mut self, image: ImagePayload) -> Self {
        self.extra_image = Some(image);
        self
    }

    /// 校验必填字段与附带图片。
    ///
    /// # Errors
    /// 机构名、主题或描述为空白时返回 [`Error::MissingField`]；
    /// 附带图片无效时返回 [`Error::MalformedImage`]。
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("organization_name", &self.organization_name),
            ("topic", &self.topic),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(Error::MissingField { field });
            }
        }
        for image in [&self.logo, &self.extra_image].into_iter().flatten() {
            image.ensure_well_formed()?;
        }
        Ok(())
    }

    /// 组合生成 prompt：已填写的文本字段加六条设计要求。
    #[must_use]
    pub fn prompt(&self) -> String {
        let category = self.category.label();
        let mut lines = vec![
            "You are an expert graphic designer creating an advertisement poster.".to_string(),
            "Generate a visually stunning and professional poster based on the following details."
                .to_string(),
            String::new(),
            format!("**Poster Category:** {category}"),
            format!("**Organization Name:** {}", self.organization_name.trim()),
            format!("**Main Topic/Headline:** {}", self.topic.trim()),
        ];
        push_optional(&mut lines, "Subtopic/Tagline", &self.subtopic);
        lines.push(format!("**Detailed Description:** {}", self.description.trim()));
        push_optional(&mut lines, "Key Achievements to Highlight", &self.achievements);
        push_optional(&mut lines, "Director", &self.director_name);
        push_optional(&mut lines, "Team Members", &self.team_members);

        lines.push(String::new());
        lines.push("**Design Instructions:**".to_string());
        lines.push(format!(
            "1. The design style must match the category: '{category}'. For example, a School poster should be vibrant, a Hospital poster professional and calming, a Hotel poster luxurious."
        ));
        lines.extend(
            [
                "2. The Organization Name and Main Topic must be prominent.",
                "3. All text provided must be clearly legible and well-organized into a visual hierarchy.",
                "4. If a logo image is provided (first image), it MUST be included. Place it appropriately, usually at a top or bottom corner.",
                "5. If an extra image is provided for creativity (second image), it MUST be used as a central visual element or a creative background.",
                "6. Combine all elements into a single, cohesive, and beautiful poster image. Do not output text, only the final poster image.",
            ]
            .map(String::from),
        );
        lines.join("\n")
    }

    /// 请求 parts：logo、额外图片（如有），最后是 prompt。
    #[must_use]
    pub fn parts(&self) -> Vec<Part> {
        let mut parts: Vec<Part> = [&self.logo, &self.extra_image]
            .into_iter()
            .flatten()
            .map(ImagePayload::to_part)
            .collect();
        parts.push(Part::text(self.prompt()));
        parts
    }
}

fn push_optional(lines: &mut Vec<String>, label: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        lines.push(format!("**{label}:** {value}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{jpeg_bytes, png_payload};

    #[test]
    fn categories_round_trip_through_labels() {
        assert_eq!(PosterCategory::ALL.len(), 9);
        assert_eq!(PosterCategory::default(), PosterCategory::School);
        for category in PosterCategory::ALL {
            assert_eq!(category.to_string().parse::<PosterCategory>().unwrap(), category);
        }
        assert_eq!(
            "grocery store".parse::<PosterCategory>().unwrap(),
            PosterCategory::GroceryStore
        );
        assert!("Casino".parse::<PosterCategory>().is_err());
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        let err = PosterRequest::new("Acme", "   ", "Big sale")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "topic" }));

        let err = PosterRequest::new("", "Sale", "Big sale")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "organization_name" }));

        assert!(PosterRequest::new("Acme", "Sale", "Big sale").validate().is_ok());
    }

    #[test]
    fn prompt_includes_only_provided_fields() {
        let prompt = PosterRequest::new("Acme", "Sale", "Big sale")
            .category(PosterCategory::GroceryStore)
            .director_name("Jo")
            .prompt();
        assert!(prompt.contains("**Poster Category:** Grocery Store"));
        assert!(prompt.contains("**Organization Name:** Acme"));
        assert!(prompt.contains("**Main Topic/Headline:** Sale"));
        assert!(prompt.contains("**Detailed Description:** Big sale"));
        assert!(prompt.contains("**Director:** Jo"));
        assert!(!prompt.contains("Subtopic/Tagline"));
        assert!(!prompt.contains("Team Members"));
        assert!(!prompt.contains("Key Achievements"));
        assert!(prompt.contains("match the category: 'Grocery Store'"));
        assert!(prompt.contains("6. Combine all elements"));
    }

    #[test]
    fn parts_put_logo_then_extra_image_before_prompt() {
        let extra = ImagePayload::new("image/jpeg", jpeg_bytes());
        let request = PosterRequest::new("Acme", "Sale", "Big sale")
            .extra_image(extra.clone())
            .logo(png_payload());
        let parts = request.parts();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].inline_data_ref().unwrap().mime_type, "image/png");
        assert_eq!(parts[1].inline_data_ref().unwrap().data, extra.data);
        assert_eq!(parts[2].text_value(), Some(request.prompt().as_str()));

        let text_only = PosterRequest::new("Acme", "Sale", "Big sale").parts();
        assert_eq!(text_only.len(), 1);
    }

    #[test]
    fn malformed_logo_fails_validation() {
        let request = PosterRequest::new("Acme", "Sale", "Big sale")
            .logo(ImagePayload::new("text/plain", vec![1]));
        assert!(matches!(
            request.validate().unwrap_err(),
            Error::MalformedImage { .. }
        ));
    }
}
