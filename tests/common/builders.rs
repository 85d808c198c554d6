//! Test builders: paste text assembled block by block, with the logins each
//! block should yield recorded alongside.
//!
//! These are for readability in tests, not production use. They panic on
//! invalid input rather than returning `Result`.

use fake::faker::internet::en::Username;
use fake::Fake;
use subroll_core::extractor::strip_noise;

/// A random login-shaped name that survives denylist stripping unchanged.
///
/// Faker usernames contain dots and can collide with badge words (`vip`,
/// `prime`, years); both are filtered out so the login is recoverable.
pub fn fake_login() -> String {
    loop {
        let raw: String = Username().fake();
        let mut login: String = raw
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        while login.len() < 4 {
            login.push('_');
        }
        login.truncate(25);
        if strip_noise(&login) == login {
            return login;
        }
    }
}

/// A built paste and what extraction should recover from it, block by block.
#[derive(Debug, Clone)]
pub struct Paste {
    pub text: String,
    pub expected: Vec<Option<String>>,
}

impl Paste {
    pub fn expected_logins(&self) -> Vec<&str> {
        self.expected.iter().flatten().map(String::as_str).collect()
    }

    pub fn expected_errors(&self) -> usize {
        self.expected.iter().filter(|e| e.is_none()).count()
    }
}

/// Fluent builder for [`Paste`] fixtures.
///
/// # Example
///
/// ```rust
/// let paste = PasteBuilder::new()
///     .plain("user_one")
///     .with_display("ニックネーム", "abcd1234")
///     .garbage("!!! ??")
///     .half("last_login")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct PasteBuilder {
    blocks: Vec<String>,
    expected: Vec<Option<String>>,
    crlf: bool,
}

impl PasteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `login` over a time-ago line.
    pub fn plain(mut self, login: &str) -> Self {
        self.blocks.push(format!("{login}\n3日前"));
        self.expected.push(Some(login.to_string()));
        self
    }

    /// A display name with the login in parentheses on the badge line.
    pub fn with_display(mut self, display: &str, login: &str) -> Self {
        self.blocks.push(format!("{display}\n({login}) サブスクライバー 6ヶ月"));
        self.expected.push(Some(login.to_string()));
        self
    }

    /// `login` over a line of badge and tenure noise.
    pub fn noisy(mut self, login: &str) -> Self {
        self.blocks
            .push(format!("{login}\ncheer 1,000 prime gaming 3 months 2024"));
        self.expected.push(Some(login.to_string()));
        self
    }

    /// A block that should not yield a login.
    pub fn garbage(mut self, text: &str) -> Self {
        self.blocks.push(text.to_string());
        self.expected.push(None);
        self
    }

    /// A lone login, as left behind by a half-finished copy.
    pub fn half(mut self, login: &str) -> Self {
        self.blocks.push(login.to_string());
        self.expected.push(Some(login.to_string()));
        self
    }

    /// `n` plain blocks with random logins.
    pub fn fake_plain(mut self, n: usize) -> Self {
        for _ in 0..n {
            self = self.plain(&fake_login());
        }
        self
    }

    pub fn crlf(mut self) -> Self {
        self.crlf = true;
        self
    }

    pub fn build(self) -> Paste {
        let mut text = self.blocks.join("\n\n");
        if self.crlf {
            text = text.replace('\n', "\r\n");
        }
        Paste { text, expected: self.expected }
    }
}
