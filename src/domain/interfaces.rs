//! Collaborator interfaces injected into the price monitor

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use crate::shared::errors::{ComputeError, FetchError, NotifyError, StoreError};

/// Upstream price source
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// GET the url and decode the body as JSON
    async fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}

/// Durable key-value object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StoreError>;
}

/// Notification channel
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Compute platform control plane
#[async_trait]
pub trait ComputeController: Send + Sync {
    async fn update_memory_size(&self, function_name: &str, memory_mb: u32) -> Result<(), ComputeError>;
}

pub const SMS_TYPE_ATTRIBUTE: &str = "AWS.SNS.SMS.SMSType";
pub const SENDER_ID_ATTRIBUTE: &str = "AWS.SNS.SMS.SenderID";

/// Message published to the alert topic
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notification {
    pub topic_arn: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message_attributes: BTreeMap<String, MessageAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageAttribute {
    pub data_type: String,
    pub string_value: String,
}

impl Notification {
    /// Transactional SMS publish with an optional sender id and subject
    pub fn sms(
        topic: impl Into<String>,
        message: impl Into<String>,
        sender_id: Option<&str>,
        subject: Option<&str>,
    ) -> Self {
        let mut message_attributes = BTreeMap::new();
        message_attributes.insert(
            SMS_TYPE_ATTRIBUTE.to_string(),
            MessageAttribute::string("Transactional"),
        );
        if let Some(sender) = sender_id {
            message_attributes.insert(SENDER_ID_ATTRIBUTE.to_string(), MessageAttribute::string(sender));
        }

        Self {
            topic_arn: topic.into(),
            message: message.into(),
            subject: subject.map(str::to_string),
            message_attributes,
        }
    }
}

impl MessageAttribute {
    pub fn string(value: &str) -> Self {
        Self {
            data_type: "String".to_string(),
            string_value: value.to_string(),
        }
    }
}

/// Identity of the running function instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub function_name: String,
    pub memory_limit_mb: u32,
}
