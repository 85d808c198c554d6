//! Static paste corpora used across harnesses.
//!
//! Each corpus is the text a streamer would get by selecting the sub/gift
//! list in the Twitch dashboard and pasting it somewhere. Expected logins are
//! listed block by block; `None` marks a block that should fail.

/// Login on the first line, time-ago on the second.
pub const PASTE_PLAIN: &str = "\
user_one
3日前

SomeHandle123
5日前

abcd1234
12日前
";

pub const PASTE_PLAIN_EXPECTED: &[Option<&str>] =
    &[Some("user_one"), Some("SomeHandle123"), Some("abcd1234")];

/// Display names, parenthesised logins, badges and tenure noise.
pub const PASTE_NOISY: &str = "\
ニックネーム
(abcd1234) prime gaming 2024

SomeHandle123
cheer 1,000 prime gaming 3 months

配信者ファン (fan_account_99)
サブスクライバー 6ヶ月

!!! ??

gifter_jp
ビッツリーダー 2 VIP 認証済み
";

pub const PASTE_NOISY_EXPECTED: &[Option<&str>] = &[
    Some("abcd1234"),
    Some("SomeHandle123"),
    Some("fan_account_99"),
    None,
    Some("gifter_jp"),
];

/// Copied one notification at a time: the last block lost its time-ago line.
pub const PASTE_HALF: &str = "user_one\n3日前\n\nlast_login";

/// Same login gifting twice, in two otherwise identical blocks.
pub const PASTE_REPEATS: &str = "abcd1234\n1日前\n\nabcd1234\n1日前\n\n";

/// Windows clipboard.
pub const PASTE_CRLF: &str = "user_one\r\n3日前\r\n\r\nuser_two\r\n5日前";

/// Names for the summary filter: login → display name.
pub const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("abcd1234", "アブシディ"),
    ("gifter_jp", "ギフター"),
    ("SomeHandle123", "SomeHandle123"),
];

pub fn display_names() -> std::collections::HashMap<String, String> {
    DISPLAY_NAMES
        .iter()
        .map(|(login, display)| (login.to_string(), display.to_string()))
        .collect()
}
