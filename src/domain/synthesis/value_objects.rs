//! Synthesis Context - Value Objects

use super::SynthesisError;

/// 待合成的文本
///
/// 不变量: 去除首尾空白后非空
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisText(String);

impl SynthesisText {
    pub fn new(text: impl Into<String>) -> Result<Self, SynthesisError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 字符数（用于日志，不是字节数）
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl std::fmt::Display for SynthesisText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色或语言选择器
///
/// 由具体的上游决定含义：完整音色名（`zh-CN-XiaoxiaoNeural`）或语言代码（`zh-CN`）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSelector(String);

impl VoiceSelector {
    pub fn new(selector: impl Into<String>) -> Result<Self, SynthesisError> {
        let selector = selector.into().trim().to_string();
        if selector.is_empty() {
            return Err(SynthesisError::EmptySelector);
        }
        Ok(Self(selector))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 语言区域部分
    ///
    /// `zh-CN-XiaoxiaoNeural` -> `zh-CN`；本身就是语言代码时原样返回。
    pub fn locale(&self) -> &str {
        let mut dashes = self.0.match_indices('-').map(|(i, _)| i);
        match (dashes.next(), dashes.next()) {
            (Some(_), Some(second)) => &self.0[..second],
            _ => &self.0,
        }
    }
}

impl std::fmt::Display for VoiceSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 上游返回的音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mpeg,
    Ogg,
    Wav,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mpeg => "audio/mpeg",
            Self::Ogg => "audio/ogg",
            Self::Wav => "audio/wav",
        }
    }

    /// 从 Azure `X-Microsoft-OutputFormat` 取值推断容器格式
    pub fn from_azure_output_format(output_format: &str) -> Option<Self> {
        let format = output_format.to_ascii_lowercase();
        if format.ends_with("mp3") {
            Some(Self::Mpeg)
        } else if format.starts_with("ogg-") || format.starts_with("webm-") {
            Some(Self::Ogg)
        } else if format.starts_with("riff-") || format.starts_with("raw-") {
            Some(Self::Wav)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_rejected() {
        assert_eq!(SynthesisText::new(""), Err(SynthesisError::EmptyText));
        assert_eq!(SynthesisText::new("   \n"), Err(SynthesisError::EmptyText));
    }

    #[test]
    fn test_text_kept_verbatim() {
        let text = SynthesisText::new("  你好，世界 ").unwrap();
        assert_eq!(text.as_str(), "  你好，世界 ");
        assert_eq!(text.char_count(), 8);
    }

    #[test]
    fn test_selector_trimmed() {
        let selector = VoiceSelector::new(" zh-CN ").unwrap();
        assert_eq!(selector.as_str(), "zh-CN");
        assert_eq!(VoiceSelector::new(" "), Err(SynthesisError::EmptySelector));
    }

    #[test]
    fn test_selector_locale() {
        let voice = VoiceSelector::new("zh-CN-XiaoxiaoNeural").unwrap();
        assert_eq!(voice.locale(), "zh-CN");

        let multi = VoiceSelector::new("en-US-AndrewMultilingualNeural").unwrap();
        assert_eq!(multi.locale(), "en-US");

        let lang = VoiceSelector::new("zh-CN").unwrap();
        assert_eq!(lang.locale(), "zh-CN");

        let short = VoiceSelector::new("en").unwrap();
        assert_eq!(short.locale(), "en");
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(AudioFormat::Mpeg.mime_type(), "audio/mpeg");
        assert_eq!(AudioFormat::Ogg.mime_type(), "audio/ogg");
        assert_eq!(AudioFormat::Wav.mime_type(), "audio/wav");
    }

    #[test]
    fn test_azure_output_format() {
        assert_eq!(
            AudioFormat::from_azure_output_format("audio-24khz-48kbitrate-mono-mp3"),
            Some(AudioFormat::Mpeg)
        );
        assert_eq!(
            AudioFormat::from_azure_output_format("ogg-24khz-16bit-mono-opus"),
            Some(AudioFormat::Ogg)
        );
        assert_eq!(
            AudioFormat::from_azure_output_format("riff-24khz-16bit-mono-pcm"),
            Some(AudioFormat::Wav)
        );
        assert_eq!(AudioFormat::from_azure_output_format("amr-wb-16000hz"), None);
    }
}
