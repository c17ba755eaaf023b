//! SSML 构造
//!
//! 纯函数，无内部状态

use super::{SynthesisText, VoiceSelector};

/// 转义 XML 的五个保留字符
///
/// `&` `<` `>` `'` `"` 分别替换为对应实体，其他字符原样保留。
pub fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 构造单音色 SSML 文档
///
/// `xml:lang` 取自音色名的语言区域部分。
pub fn build_ssml(text: &SynthesisText, voice: &VoiceSelector) -> String {
    format!(
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='{}'><voice name='{}'>{}</voice></speak>",
        escape_xml(voice.locale()),
        escape_xml(voice.as_str()),
        escape_xml(text.as_str()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice_content(ssml: &str) -> &str {
        let start = ssml.find("'>").map(|i| i + 2).unwrap();
        let start = start + ssml[start..].find("'>").unwrap() + 2;
        let end = ssml.rfind("</voice>").unwrap();
        &ssml[start..end]
    }

    #[test]
    fn test_escape_all_reserved_characters() {
        assert_eq!(
            escape_xml(r#"<b>Tom & "Jerry's"</b>"#),
            "&lt;b&gt;Tom &amp; &quot;Jerry&apos;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escape_leaves_plain_text() {
        assert_eq!(escape_xml("你好，世界"), "你好，世界");
        assert_eq!(escape_xml(""), "");
    }

    #[test]
    fn test_escape_is_single_pass() {
        // 逐字符处理：已有实体里的 `&` 同样被转义
        assert_eq!(escape_xml("<&>"), "&lt;&amp;&gt;");
        assert_eq!(escape_xml("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_build_ssml_structure() {
        let text = SynthesisText::new("你好").unwrap();
        let voice = VoiceSelector::new("zh-CN-XiaoxiaoNeural").unwrap();

        let ssml = build_ssml(&text, &voice);
        assert_eq!(
            ssml,
            "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='zh-CN'><voice name='zh-CN-XiaoxiaoNeural'>你好</voice></speak>"
        );
    }

    #[test]
    fn test_build_ssml_escapes_injection() {
        let text = SynthesisText::new("</voice><voice name='evil'>a & b \"c\"").unwrap();
        let voice = VoiceSelector::new("zh-CN-XiaoxiaoNeural").unwrap();

        let ssml = build_ssml(&text, &voice);
        let content = voice_content(&ssml);

        for raw in ['<', '>', '\'', '"'] {
            assert!(!content.contains(raw), "raw {raw:?} leaked into {content}");
        }
        assert_eq!(
            content,
            "&lt;/voice&gt;&lt;voice name=&apos;evil&apos;&gt;a &amp; b &quot;c&quot;"
        );
        assert_eq!(ssml.matches("<voice ").count(), 1);
        assert_eq!(ssml.matches("</voice>").count(), 1);
    }

    #[test]
    fn test_build_ssml_escapes_voice_name() {
        let text = SynthesisText::new("hi").unwrap();
        let voice = VoiceSelector::new("x'/><evil").unwrap();

        let ssml = build_ssml(&text, &voice);
        assert!(ssml.contains("<voice name='x&apos;/&gt;&lt;evil'>"));
    }
}
