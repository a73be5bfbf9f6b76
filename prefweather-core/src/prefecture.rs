use std::{convert::TryFrom, fmt};

/// Japan's 47 prefectures, in the conventional north-to-south order.
pub static PREFECTURES: [&str; 47] = [
    "北海道", "青森県", "岩手県", "宮城県", "秋田県", "山形県", "福島県",
    "茨城県", "栃木県", "群馬県", "埼玉県", "千葉県", "東京都", "神奈川県",
    "新潟県", "富山県", "石川県", "福井県", "山梨県", "長野県",
    "岐阜県", "静岡県", "愛知県", "三重県",
    "滋賀県", "京都府", "大阪府", "兵庫県", "奈良県", "和歌山県",
    "鳥取県", "島根県", "岡山県", "広島県", "山口県",
    "徳島県", "香川県", "愛媛県", "高知県",
    "福岡県", "佐賀県", "長崎県", "熊本県", "大分県", "宮崎県", "鹿児島県", "沖縄県",
];

const DEFAULT_PREFECTURE: &str = "大阪府";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefecture(&'static str);

impl Prefecture {
    pub fn name(&self) -> &'static str {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Prefecture> {
        PREFECTURES.iter().map(|name| Prefecture(*name))
    }

    /// Free-text location the connector geocodes.
    pub fn location_text(&self) -> String {
        format!("{}, 日本", self.0)
    }
}

impl Default for Prefecture {
    fn default() -> Self {
        Prefecture(DEFAULT_PREFECTURE)
    }
}

impl fmt::Display for Prefecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl TryFrom<&str> for Prefecture {
    type Error = anyhow::Error;

    /// Accepts the full name (`大阪府`) or the name without its suffix (`大阪`).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();

        PREFECTURES
            .iter()
            .find(|name| {
                **name == value
                    || name
                        .strip_suffix(['都', '府', '県'])
                        .is_some_and(|short| short == value)
            })
            .map(|name| Prefecture(*name))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown prefecture '{value}'.\n\
                     Hint: run `prefweather prefectures` to list valid names."
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_forty_seven_unique_names() {
        let mut names: Vec<_> = PREFECTURES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 47);
    }

    #[test]
    fn lookup_by_full_and_short_name() {
        assert_eq!(Prefecture::try_from("東京都").unwrap().name(), "東京都");
        assert_eq!(Prefecture::try_from("東京").unwrap().name(), "東京都");
        assert_eq!(Prefecture::try_from("京都").unwrap().name(), "京都府");
        assert_eq!(Prefecture::try_from("北海道").unwrap().name(), "北海道");
    }

    #[test]
    fn unknown_prefecture_error() {
        let err = Prefecture::try_from("Atlantis").unwrap_err();
        assert!(err.to_string().contains("Unknown prefecture"));
    }

    #[test]
    fn default_is_osaka() {
        assert_eq!(Prefecture::default().to_string(), "大阪府");
        assert_eq!(Prefecture::default().location_text(), "大阪府, 日本");
    }
}
