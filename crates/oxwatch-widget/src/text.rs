use crate::size::{DEFAULT_TEXT_WIDGET_HEIGHT, FULL_WIDTH, HEADER_WIDGET_HEIGHT};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct TextWidget {
    pub markdown: String,
    pub width: u32,
    pub height: u32,
}

impl TextWidget {
    /// Full-width text block.
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            width: FULL_WIDTH,
            height: DEFAULT_TEXT_WIDGET_HEIGHT,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn to_json(&self) -> Value {
        json!({
            "type": "text",
            "width": self.width,
            "height": self.height,
            "properties": { "markdown": self.markdown },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderLevel {
    #[default]
    Large,
    Medium,
    Small,
}

impl HeaderLevel {
    fn markdown_prefix(&self) -> &'static str {
        match self {
            Self::Large => "#",
            Self::Medium => "##",
            Self::Small => "###",
        }
    }
}

/// Full-width, one unit high markdown heading.
pub fn header_widget(text: &str, level: HeaderLevel) -> TextWidget {
    TextWidget {
        markdown: format!("{} {text}", level.markdown_prefix()),
        width: FULL_WIDTH,
        height: HEADER_WIDGET_HEIGHT,
    }
}

/// Section heading of one monitored resource, e.g.
/// `### API Gateway Endpoint **Orders**`.
#[derive(Debug, Clone, Default)]
pub struct MonitoringHeader {
    pub title: String,
    pub family: Option<String>,
    pub go_to_link_url: Option<String>,
}

impl MonitoringHeader {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.go_to_link_url = Some(url.into());
        self
    }

    pub fn text(&self) -> String {
        let title = match &self.go_to_link_url {
            Some(url) => format!("[{}]({url})", self.title),
            None => self.title.clone(),
        };
        match &self.family {
            Some(family) => format!("{family} **{title}**"),
            None => title,
        }
    }

    pub fn to_widget(&self) -> TextWidget {
        header_widget(&self.text(), HeaderLevel::Small)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_markdown() {
        assert_eq!(header_widget("Orders", HeaderLevel::Large).markdown, "# Orders");
        assert_eq!(header_widget("Orders", HeaderLevel::Medium).markdown, "## Orders");

        let header = MonitoringHeader::new("Orders")
            .with_family("API Gateway Endpoint")
            .with_link("https://console/orders")
            .to_widget();
        assert_eq!(
            header.markdown,
            "### API Gateway Endpoint **[Orders](https://console/orders)**"
        );
        assert_eq!((header.width, header.height), (24, 1));
    }
}
