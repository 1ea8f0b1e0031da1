use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
    /// English registration texts with Chinese login texts, as served by the
    /// first deployment. Existing clients match on these strings.
    Legacy,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "en-us" => Ok(Self::En),
            "zh" | "zh-cn" => Ok(Self::Zh),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown locale '{other}'")),
        }
    }
}

/// Response texts for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub registered: &'static str,
    pub username_taken: &'static str,
    pub user_not_found: &'static str,
    pub wrong_password: &'static str,
    pub invalid_credentials: &'static str,
    pub invalid_input: &'static str,
    pub store_error: &'static str,
    pub internal_error: &'static str,
}

const EN: Messages = Messages {
    registered: "Registration successful!",
    username_taken: "Username already exists.",
    user_not_found: "User does not exist.",
    wrong_password: "Incorrect password.",
    invalid_credentials: "Invalid username or password.",
    invalid_input: "Username and password are required.",
    store_error: "Database error.",
    internal_error: "Internal server error.",
};

const ZH: Messages = Messages {
    registered: "注册成功！",
    username_taken: "用户名已存在",
    user_not_found: "用户不存在",
    wrong_password: "密码错误",
    invalid_credentials: "用户名或密码错误",
    invalid_input: "用户名和密码不能为空",
    store_error: "数据库错误",
    internal_error: "服务器内部错误",
};

const LEGACY: Messages = Messages {
    registered: EN.registered,
    username_taken: EN.username_taken,
    user_not_found: ZH.user_not_found,
    wrong_password: ZH.wrong_password,
    invalid_credentials: ZH.invalid_credentials,
    invalid_input: EN.invalid_input,
    store_error: ZH.store_error,
    internal_error: EN.internal_error,
};

impl Locale {
    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::Zh => &ZH,
            Locale::Legacy => &LEGACY,
        }
    }
}
