//! Push channels and the dispatcher that fans a slot summary out to them

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::{AppConfig, ChannelConfig, ChannelName, NotifyEndpoints};
use crate::error::NotifyError;

/// Prefix of every pushdeer message
pub const PUSHDEER_TAG: &str = "[抢场地]";
/// Prefix of every feishu / lark bot message
pub const BOT_TAG: &str = "[捡球场]";

/// Join rendered slots into the text block that gets pushed
pub fn render_summary(content: &[String]) -> String {
    content.join("\n")
}

// Body of a feishu / lark custom bot text message
#[derive(Debug, Serialize)]
pub struct BotTextMessage {
    pub msg_type: &'static str,
    pub content: BotTextContent,
}

#[derive(Debug, Serialize)]
pub struct BotTextContent {
    pub text: String,
}

impl BotTextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            msg_type: "text",
            content: BotTextContent { text: text.into() },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PushDeerChannel {
    pub url: String,
    pub tokens: Vec<String>,
}

impl PushDeerChannel {
    async fn send(
        &self,
        client: &Client,
        timeout: Duration,
        text: &str,
    ) -> Result<(), NotifyError> {
        if self.tokens.is_empty() {
            return Err(NotifyError::NoTokens);
        }

        let text = format!("{}{}", PUSHDEER_TAG, text);
        let mut failed = 0;

        for token in &self.tokens {
            let result = client
                .get(&self.url)
                .query(&[("pushkey", token.as_str()), ("text", text.as_str())])
                .timeout(timeout)
                .send()
                .await
                .map_err(NotifyError::from)
                .and_then(|res| {
                    if res.status().is_success() {
                        Ok(())
                    } else {
                        Err(NotifyError::Status(res.status()))
                    }
                });

            if let Err(e) = result {
                error!(
                    "Error sending notification with pushdeer using token {}: {}",
                    token, e
                );
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(NotifyError::PartialBroadcast {
                failed,
                total: self.tokens.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BotChannel {
    pub hook_url: String,
}

impl BotChannel {
    pub fn new(hook_base: &str, token: &str) -> Self {
        Self {
            hook_url: format!("{}/{}", hook_base.trim_end_matches('/'), token),
        }
    }

    async fn send(
        &self,
        client: &Client,
        timeout: Duration,
        text: &str,
    ) -> Result<(), NotifyError> {
        let body = BotTextMessage::new(format!("{}{}", BOT_TAG, text));

        let res = client
            .post(&self.hook_url)
            .header("Content-Type", "application/json; charset=utf-8")
            .json(&body)
            .timeout(timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(NotifyError::Status(res.status()));
        }
        Ok(())
    }
}

/// An enabled notification backend
#[derive(Debug, Clone)]
pub enum Channel {
    PushDeer(PushDeerChannel),
    FeishuBot(BotChannel),
    LarkBot(BotChannel),
}

impl Channel {
    pub fn from_config(config: &ChannelConfig, endpoints: &NotifyEndpoints) -> Self {
        match config {
            ChannelConfig::PushDeer { tokens } => Channel::PushDeer(PushDeerChannel {
                url: endpoints.pushdeer_url.clone(),
                tokens: tokens.clone(),
            }),
            ChannelConfig::FeishuBot { token } => {
                Channel::FeishuBot(BotChannel::new(&endpoints.feishu_hook_base, token))
            }
            ChannelConfig::LarkBot { token } => {
                Channel::LarkBot(BotChannel::new(&endpoints.lark_hook_base, token))
            }
        }
    }

    pub fn name(&self) -> ChannelName {
        match self {
            Channel::PushDeer(_) => ChannelName::PushDeer,
            Channel::FeishuBot(_) => ChannelName::FeishuBot,
            Channel::LarkBot(_) => ChannelName::LarkBot,
        }
    }

    /// Deliver `text` to this backend
    pub async fn send(
        &self,
        client: &Client,
        timeout: Duration,
        text: &str,
    ) -> Result<(), NotifyError> {
        match self {
            Channel::PushDeer(channel) => channel.send(client, timeout, text).await,
            Channel::FeishuBot(channel) | Channel::LarkBot(channel) => {
                channel.send(client, timeout, text).await
            }
        }
    }
}

/// Outcome of sending to a single channel
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    Sent,
    Failed(String),
}

/// Sends the slot summary to every enabled channel, one after another
pub struct NotificationDispatcher {
    client: Client,
    channels: Vec<Channel>,
    timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        let channels = config
            .channels
            .iter()
            .map(|channel| Channel::from_config(channel, &config.endpoints))
            .collect();

        Self {
            client,
            channels,
            timeout: config.endpoints.timeout,
        }
    }

    /// Push `content` to each channel. A failing channel is logged and does not stop the others.
    pub async fn dispatch(&self, content: &[String]) -> Vec<(ChannelName, SendResult)> {
        let text = render_summary(content);
        let mut results = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let name = channel.name();
            debug!("Dispatching {} slots to {}", content.len(), name);

            let result = match channel.send(&self.client, self.timeout, &text).await {
                Ok(()) => {
                    info!("Notification sent with {}", name);
                    SendResult::Sent
                }
                Err(e) => {
                    error!("Error sending notification with {}: {}", name, e);
                    SendResult::Failed(e.to_string())
                }
            };

            results.push((name, result));
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_summary() {
        let content = vec![
            "06月03日14时LG1-C1".to_string(),
            "06月04日09时SF-C1".to_string(),
        ];
        assert_eq!(render_summary(&content), "06月03日14时LG1-C1\n06月04日09时SF-C1");
        assert_eq!(render_summary(&[]), "");
    }

    #[test]
    fn test_bot_message_shape() {
        let body = serde_json::to_value(BotTextMessage::new("[捡球场]hello")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"msg_type": "text", "content": {"text": "[捡球场]hello"}})
        );
    }

    #[tokio::test]
    async fn test_pushdeer_without_tokens_is_a_failure() {
        let mut config = AppConfig::from_lookup(|key| match key {
            "PLATFORMS" => Some("alumni".to_string()),
            "PUSH_CHANNEL" => Some("pushdeer".to_string()),
            "PUSHDEER_TOKEN" => Some("key".to_string()),
            "ALUMNI_USER_AGENT" | "ALUMNI_AUTHORIZATION" => Some("x".to_string()),
            _ => None,
        })
        .unwrap();
        // Built directly, bypassing config validation
        config.channels = vec![ChannelConfig::PushDeer { tokens: vec![] }];
        config.endpoints.pushdeer_url = "http://127.0.0.1:1/message/push".to_string();

        let dispatcher = NotificationDispatcher::new(Client::new(), &config);
        let results = dispatcher.dispatch(&["x".to_string()]).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, ChannelName::PushDeer);
        assert_eq!(
            results[0].1,
            SendResult::Failed(NotifyError::NoTokens.to_string())
        );
    }

    #[test]
    fn test_channel_from_config() {
        let endpoints = NotifyEndpoints::default();

        let lark = Channel::from_config(
            &ChannelConfig::LarkBot {
                token: "abc".to_string(),
            },
            &endpoints,
        );
        match lark {
            Channel::LarkBot(bot) => assert_eq!(
                bot.hook_url,
                "https://open.larksuite.com/open-apis/bot/v2/hook/abc"
            ),
            other => panic!("unexpected channel {:?}", other),
        }

        let feishu = Channel::from_config(
            &ChannelConfig::FeishuBot {
                token: "xyz".to_string(),
            },
            &endpoints,
        );
        assert_eq!(feishu.name(), ChannelName::FeishuBot);
        if let Channel::FeishuBot(bot) = feishu {
            assert_eq!(bot.hook_url, "https://open.feishu.cn/open-apis/bot/v2/hook/xyz");
        }
    }
}
