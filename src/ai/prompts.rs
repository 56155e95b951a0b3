//! System prompt and message builders for the diary analyses.
//!
//! The output-format directives inside these prompts are the de-facto wire
//! contract with the model: the parsers in [`crate::ai::parse`] expect
//! exactly the formats requested here, so the strings must not be reworded.

use super::client::Message;

/// System prompt for all diary analysis calls.
pub const SYSTEM_PROMPT: &str = "你是一位日記分析專家，擅長分析使用者的日記並給予鼓勵與建議。";

/// Reply budget for the counselor feedback (about 90 CJK characters).
pub const MAX_TOKENS_FEEDBACK: u32 = 150;
/// Reply budget for the weekly happiness lines (up to 7 lines).
pub const MAX_TOKENS_HAPPINESS: u32 = 150;
/// Reply budget for the five emotion-proportion lines.
pub const MAX_TOKENS_EMOTION: u32 = 100;
/// Reply budget for the top-3 word lines.
pub const MAX_TOKENS_TOP_WORDS: u32 = 60;
/// Reply budget for the single selected date token.
pub const MAX_TOKENS_SELECTION: u32 = 30;
/// Reply budget for the daily encouragement line.
pub const MAX_TOKENS_DAILY_MESSAGE: u32 = 50;

/// Builds messages for the counselor-style feedback on recent entries.
///
/// # Arguments
///
/// * `combined_text` - Entries serialized as `日期<date>：<text>` lines
pub fn feedback_prompt(combined_text: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            r#"你是一位專業的心理諮商師，請根據以下的日記內容，提供一段溫暖且具有建設性的回饋。
1. 觀察到的情緒模式或行為特徵
2. 值得肯定的正面行為或思維
3. 可以改善的建議（如果有的話）
4. 鼓勵的話
5. 不用稱謂，直接給建議文字. 第一行前面要空兩格

請用溫暖親切的語氣，連同標點符號一定要控制在90字以內。

日記內容：
{}"#,
            combined_text
        )),
    ]
}

/// Builds messages for the per-day weekly happiness analysis.
///
/// The reply contract is one line per day: `日期: yyyyMMdd, 快樂指數: XX`.
pub fn weekly_happiness_prompt(combined_text: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            r#"下面是使用者近一週的日記內容，請逐日分析「快樂指數」，每一天的快樂指數是0到100的數值。
回傳格式一定要是：
日期: yyyyMMdd, 快樂指數: XX
只要純資料，不要額外解釋
{}"#,
            combined_text
        )),
    ]
}

/// Builds messages for the overall emotion-proportion analysis.
///
/// The reply contract is one `<label>: <n>%` line per category across the
/// five fixed labels.
pub fn emotion_proportion_prompt(combined_text: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            r#"下面是使用者近一週或近一月的日記內容，請分析所有日記的整體「情緒比例」，回傳格式如下：
快樂: 30%
生氣: 25%
焦慮: 15%
悲傷: 20%
平靜: 10%
只要這個格式，不需要其他說明。
{}"#,
            combined_text
        )),
    ]
}

/// Builds messages for the top-3 frequent-word analysis.
///
/// The reply contract is up to three `<word> <count>次` lines.
pub fn top_words_prompt(combined_text: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            r#"以下是使用者近一個月的日記內容，請統計最常出現的前三個單字，回傳格式如下：
開心 12次
工作 10次
朋友 9次
只要這個格式，不要額外解釋，也不要換行輸出其他內容。
{}"#,
            combined_text
        )),
    ]
}

/// Builds messages for picking the most positive entry of the month.
///
/// The reply contract is a single bare `yyyyMMdd` token.
///
/// # Arguments
///
/// * `combined_text` - Entries serialized as `日期: <date>，內容: <text>` lines
pub fn selection_prompt(combined_text: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            r#"以下是使用者過去一個月的日記，請幫我選擇 **情緒最正面且文字最多** 的日記內容：
- 只需回傳該日記的「日期」，不要額外的說明。

{}"#,
            combined_text
        )),
    ]
}

/// Builds messages for the standalone daily encouragement line.
pub fn daily_message_prompt() -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user("請給我今天的鼓勵話語,30字以內。"),
    ]
}
