//! The closed set of article categories.
//!
//! Posts are filed under one of seven fixed Japanese category labels. Each
//! category carries both its WordPress term id and a default featured image,
//! defined together so neither mapping can drift out of sync with the other.

use std::fmt;

/// One of the seven fixed article categories.
///
/// The classifier prompt offers exactly these labels; anything else the model
/// returns resolves to [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// 画像生成AI
    ImageGeneration,
    /// チャット・対話AI
    Chat,
    /// 音声合成・認識AI
    Voice,
    /// SNS分析・マーケティングAI
    SnsMarketing,
    /// ライティング支援AI
    Writing,
    /// プログラミング支援AI
    Programming,
    /// その他
    Other,
}

impl Category {
    /// Every category, in the order the classifier prompt lists them.
    pub const ALL: [Category; 7] = [
        Category::ImageGeneration,
        Category::Chat,
        Category::Voice,
        Category::SnsMarketing,
        Category::Writing,
        Category::Programming,
        Category::Other,
    ];

    /// The Japanese label shown to the model and to readers.
    pub fn label(self) -> &'static str {
        match self {
            Category::ImageGeneration => "画像生成AI",
            Category::Chat => "チャット・対話AI",
            Category::Voice => "音声合成・認識AI",
            Category::SnsMarketing => "SNS分析・マーケティングAI",
            Category::Writing => "ライティング支援AI",
            Category::Programming => "プログラミング支援AI",
            Category::Other => "その他",
        }
    }

    /// The WordPress category term id.
    pub fn id(self) -> u32 {
        match self {
            Category::ImageGeneration => 3,
            Category::Chat => 4,
            Category::Voice => 5,
            Category::SnsMarketing => 6,
            Category::Writing => 7,
            Category::Programming => 8,
            Category::Other => 1,
        }
    }

    /// The featured image used when a post's page yields no `og:image`.
    pub fn default_image_url(self) -> &'static str {
        match self {
            Category::ImageGeneration => {
                "https://in-house.co.jp/ai/wp-content/uploads/2025/06/image-generation-scaled-e1749025087348.jpeg"
            }
            Category::Chat => "https://in-house.co.jp/ai/wp-content/uploads/2025/06/chat-scaled.jpeg",
            Category::Voice => {
                "https://in-house.co.jp/ai/wp-content/uploads/2025/06/voice-scaled-e1749024908999.jpeg"
            }
            Category::SnsMarketing => {
                "https://in-house.co.jp/ai/wp-content/uploads/2025/06/sns-e1749024963907.jpeg"
            }
            Category::Writing => {
                "https://in-house.co.jp/ai/wp-content/uploads/2025/06/writing-scaled-e1749025018331.jpeg"
            }
            Category::Programming => {
                "https://in-house.co.jp/ai/wp-content/uploads/2025/06/programming-scaled-e1749025048816.jpeg"
            }
            Category::Other => {
                "https://in-house.co.jp/ai/wp-content/uploads/2025/06/others-scaled-e1749024735357.jpeg"
            }
        }
    }

    /// Exact lookup of a trimmed label.
    pub fn from_label(label: &str) -> Option<Category> {
        let label = label.trim();
        Category::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Lenient classification of raw model output.
    ///
    /// The classifier is asked to return one label and nothing else, but the
    /// response is unverified free text. An exact match wins; otherwise the
    /// first known label appearing anywhere in the text is taken; otherwise
    /// the post is filed under その他.
    pub fn classify(text: &str) -> Category {
        if let Some(c) = Category::from_label(text) {
            return c;
        }
        Category::ALL
            .into_iter()
            .find(|c| text.contains(c.label()))
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_label_resolves_to_id_4() {
        let category = Category::classify("チャット・対話AI");
        assert_eq!(category, Category::Chat);
        assert_eq!(category.id(), 4);
        assert_eq!(
            category.default_image_url(),
            "https://in-house.co.jp/ai/wp-content/uploads/2025/06/chat-scaled.jpeg"
        );
    }

    #[test]
    fn test_unknown_label_falls_back_to_other() {
        let category = Category::classify("ブロックチェーンAI");
        assert_eq!(category, Category::Other);
        assert_eq!(category.id(), 1);
    }

    #[test]
    fn test_classify_trims_whitespace() {
        assert_eq!(Category::classify("  画像生成AI\n"), Category::ImageGeneration);
    }

    #[test]
    fn test_classify_tolerates_surrounding_text() {
        let category = Category::classify("最も近いカテゴリはライティング支援AIです。");
        assert_eq!(category, Category::Writing);
    }

    #[test]
    fn test_every_category_has_label_id_and_image() {
        for category in Category::ALL {
            assert!(!category.label().is_empty());
            assert!(category.id() >= 1);
            assert!(category.default_image_url().starts_with("https://"));
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
    }

    #[test]
    fn test_other_is_the_default_id() {
        assert_eq!(Category::Other.id(), 1);
        assert_eq!(Category::Other.label(), "その他");
    }
}
