//! Generation [`Request`] and the style options a user picks for it.

use serde::{Deserialize, Serialize};

/// Longest prompt accepted, in characters.
pub const MAX_PROMPT_CHARS: usize = 128;

/// Validation [`Result`] type. See also [`Invalid`].
pub type Result<T> = std::result::Result<T, Invalid>;

/// What the user wants said and how they want it said.
///
/// Only `prompt` is required when deserializing. Every option falls back to
/// its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Request {
    /// The literal text the crafted message should convey.
    pub prompt: String,
    /// [`Tone`] of the message.
    #[serde(default)]
    pub tone: Tone,
    /// Whether the message should include emojis.
    #[serde(default)]
    pub emoticon: bool,
    /// [`Language`] to write the message in.
    #[serde(default)]
    pub language: Language,
    /// [`Style`] (formality) of the message.
    #[serde(default)]
    pub style: Style,
    /// [`Length`] of the message.
    #[serde(default)]
    pub length: Length,
}

impl Request {
    /// New request for `prompt` with default options.
    pub fn new<S>(prompt: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Set the [`Tone`].
    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Set whether emojis should be included.
    pub fn emoticon(mut self, emoticon: bool) -> Self {
        self.emoticon = emoticon;
        self
    }

    /// Set the [`Language`].
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set the [`Style`].
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the [`Length`].
    pub fn length(mut self, length: Length) -> Self {
        self.length = length;
        self
    }

    /// Check the prompt is present and short enough. Nothing should reach the
    /// completion provider without passing this.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(Invalid::EmptyPrompt);
        }

        let chars = self.prompt.chars().count();
        if chars > MAX_PROMPT_CHARS {
            return Err(Invalid::PromptTooLong { chars });
        }

        Ok(())
    }
}

/// A [`Request`] that must not be sent.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Invalid {
    /// Prompt is empty or only whitespace.
    #[error("Please enter a prompt.")]
    EmptyPrompt,
    /// Prompt is longer than [`MAX_PROMPT_CHARS`].
    #[error(
        "The prompt must be at most {} characters (got {chars}).",
        MAX_PROMPT_CHARS
    )]
    PromptTooLong {
        /// Length of the rejected prompt in characters.
        chars: usize,
    },
}

/// Whether a [`Tone`] reads as positive or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Mood {
    /// Neither.
    Neutral,
    /// Upbeat tones.
    Positive,
    /// Downbeat tones.
    Negative,
}

/// Tone of the crafted message.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Tone {
    #[default]
    Normal,
    Happy,
    Funny,
    Romantic,
    Sarcastic,
    Celebratory,
    Polite,
    Respectful,
    Motivational,
    Sad,
    Regretful,
    Arrogant,
    Judgemental,
    Disappointed,
}

impl Tone {
    /// Every tone, in the order a form would list them.
    pub const ALL: [Tone; 14] = [
        Self::Normal,
        Self::Happy,
        Self::Funny,
        Self::Romantic,
        Self::Sarcastic,
        Self::Celebratory,
        Self::Polite,
        Self::Respectful,
        Self::Motivational,
        Self::Sad,
        Self::Regretful,
        Self::Arrogant,
        Self::Judgemental,
        Self::Disappointed,
    ];

    /// [`Mood`] group the tone belongs to.
    pub const fn mood(&self) -> Mood {
        match self {
            Self::Normal => Mood::Neutral,
            Self::Happy
            | Self::Funny
            | Self::Romantic
            | Self::Sarcastic
            | Self::Celebratory
            | Self::Polite
            | Self::Respectful
            | Self::Motivational => Mood::Positive,
            Self::Sad
            | Self::Regretful
            | Self::Arrogant
            | Self::Judgemental
            | Self::Disappointed => Mood::Negative,
        }
    }
}

/// Output language. The model must not translate its answer.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Marathi,
}

/// Formality of the message.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum Style {
    #[default]
    Casual,
    SemiFormal,
    Formal,
}

/// Length of the message.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Length {
    Short,
    #[default]
    Normal,
    Long,
}

impl Tone {
    /// Get the wire token for the tone.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Happy => "happy",
            Self::Funny => "funny",
            Self::Romantic => "romantic",
            Self::Sarcastic => "sarcastic",
            Self::Celebratory => "celebratory",
            Self::Polite => "polite",
            Self::Respectful => "respectful",
            Self::Motivational => "motivational",
            Self::Sad => "sad",
            Self::Regretful => "regretful",
            Self::Arrogant => "arrogant",
            Self::Judgemental => "judgemental",
            Self::Disappointed => "disappointed",
        }
    }
}

impl Language {
    /// Get the wire token for the language.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Hindi => "hindi",
            Self::Marathi => "marathi",
        }
    }
}

impl Style {
    /// Get the wire token for the style.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::SemiFormal => "semi-formal",
            Self::Formal => "formal",
        }
    }
}

impl Length {
    /// Get the wire token for the length.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Normal => "normal",
            Self::Long => "long",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(Tone, Language, Style, Length);
