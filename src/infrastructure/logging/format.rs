//! Log line formats and colorized styling
//!
//! Formats use `{name}`, `{levelname}` and `{message}` placeholders. Any
//! other `{...}` text is printed as-is.

use colored::{Color, ColoredString, Colorize};

use super::record::LogRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    LevelName,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Parsed format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFormat {
    source: String,
    segments: Vec<Segment>,
}

impl LogFormat {
    pub fn new(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                literal.push_str(&rest[open..]);
                rest = "";
                break;
            };

            let field = match &after[..close] {
                "name" => Some(Field::Name),
                "levelname" => Some(Field::LevelName),
                "message" => Some(Field::Message),
                _ => None,
            };
            match field {
                Some(field) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                None => literal.push_str(&rest[open..open + close + 2]),
            }
            rest = &after[close + 1..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    /// The original format string
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render without colors
    pub fn render(&self, record: &LogRecord) -> String {
        self.render_with(record, |_, text| text.to_string())
    }

    fn render_with<F>(&self, record: &LogRecord, paint: F) -> String
    where
        F: Fn(Field, &str) -> String,
    {
        let mut line = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::Field(field) => {
                    let text = match field {
                        Field::Name => record.name.as_str(),
                        Field::LevelName => record.level_name,
                        Field::Message => record.message.as_str(),
                    };
                    line.push_str(&paint(*field, text));
                }
            }
        }
        line
    }
}

/// Terminal style for one field or level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub color: Option<Color>,
    pub bold: bool,
    pub faint: bool,
}

impl Style {
    pub const fn plain() -> Self {
        Self {
            color: None,
            bold: false,
            faint: false,
        }
    }

    pub const fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            bold: false,
            faint: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn faint(mut self) -> Self {
        self.faint = true;
        self
    }

    pub fn paint(&self, text: &str) -> String {
        let mut styled: ColoredString = text.normal();
        if let Some(color) = self.color {
            styled = styled.color(color);
        }
        if self.bold {
            styled = styled.bold();
        }
        if self.faint {
            styled = styled.dimmed();
        }
        styled.to_string()
    }
}

/// Styles for the `{name}` and `{levelname}` fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldStyles {
    pub name: Style,
    pub levelname: Style,
}

/// Message styles keyed by lowercase level name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStyles(pub &'static [(&'static str, Style)]);

impl LevelStyles {
    pub fn get(&self, level_name: &str) -> Option<Style> {
        self.0
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(level_name))
            .map(|(_, style)| *style)
    }
}

pub const LOG_FIELD_STYLES: FieldStyles = FieldStyles {
    name: Style::color(Color::Blue),
    levelname: Style::color(Color::Cyan).bold(),
};

pub const LOG_LEVEL_STYLES: LevelStyles = LevelStyles(&[
    ("critical", Style::color(Color::Red).bold()),
    ("debug", Style::color(Color::Green)),
    ("error", Style::color(Color::Red)),
    ("info", Style::plain()),
    ("notice", Style::color(Color::Magenta)),
    ("success", Style::color(Color::Green).bold()),
    ("trace", Style::color(Color::Green).faint()),
    ("warning", Style::color(Color::Yellow)),
]);

/// Turns records into lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatter {
    Plain(LogFormat),
    Colored {
        format: LogFormat,
        field_styles: FieldStyles,
        level_styles: LevelStyles,
    },
}

impl Formatter {
    pub fn plain(format: &str) -> Self {
        Self::Plain(LogFormat::new(format))
    }

    pub fn colored(format: &str, field_styles: FieldStyles, level_styles: LevelStyles) -> Self {
        Self::Colored {
            format: LogFormat::new(format),
            field_styles,
            level_styles,
        }
    }

    pub fn log_format(&self) -> &LogFormat {
        match self {
            Self::Plain(format) => format,
            Self::Colored { format, .. } => format,
        }
    }

    pub fn format(&self, record: &LogRecord) -> String {
        match self {
            Self::Plain(format) => format.render(record),
            Self::Colored {
                format,
                field_styles,
                level_styles,
            } => {
                let message_style = level_styles.get(record.level_name).unwrap_or_default();
                format.render_with(record, |field, text| match field {
                    Field::Name => field_styles.name.paint(text),
                    Field::LevelName => field_styles.levelname.paint(text),
                    Field::Message => message_style.paint(text),
                })
            }
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::plain("{message}")
    }
}
