// src/error.rs

use std::fmt;
use thiserror::Error;

/// 拉取统计数据时可能出现的所有错误
#[derive(Debug, Error)]
pub enum StatError {
    /// access_token 获取失败，此时不会发出统计请求
    #[error("failed to obtain access token: {0}")]
    Token(#[from] TokenError),

    /// 网络或 HTTP 层失败
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// 响应体不是合法 JSON，或字段类型对不上
    #[error("{operation} decode error: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// 响应中三层错误码之一非零
    #[error("{operation} Error , errcode={code} , errmsg={message}")]
    Remote {
        operation: &'static str,
        layer: ErrorLayer,
        code: i64,
        message: String,
    },
}

impl StatError {
    /// 远端返回的错误码（仅 `Remote` 有）
    pub fn remote_code(&self) -> Option<i64> {
        match self {
            StatError::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// 触发 `Remote` 错误的那一层
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLayer {
    /// 顶层 errcode / errmsg
    ErrCode,
    /// 平铺在响应体中的 ret / err_msg
    Ret,
    /// 嵌套的 base_resp.ret / base_resp.err_msg
    BaseResp,
}

impl fmt::Display for ErrorLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorLayer::ErrCode => "errcode",
            ErrorLayer::Ret => "ret",
            ErrorLayer::BaseResp => "base_resp.ret",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("access token is empty")]
    Empty,

    #[error("token request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build token HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("token endpoint returned errcode={code}, errmsg={message}")]
    Remote { code: i64, message: String },

    #[error("{0}")]
    Unavailable(String),
}

/// 传输层错误。`endpoint` 只保留 `?` 之前的部分，不会带出 access_token。
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("GET {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// 去掉 URL 的查询串，用于日志和错误信息
pub fn strip_query(url: &str) -> &str {
    url.split_once('?').map(|(base, _)| base).unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_query_hides_token() {
        let url = "https://api.weixin.qq.com/publisher/stat?action=x&access_token=secret";
        assert_eq!(strip_query(url), "https://api.weixin.qq.com/publisher/stat");
        assert_eq!(strip_query("http://localhost/a"), "http://localhost/a");
    }

    #[test]
    fn remote_error_message_embeds_code_and_message() {
        let err = StatError::Remote {
            operation: "GetPublisherCpsGeneral",
            layer: ErrorLayer::Ret,
            code: 2009,
            message: "invalid page".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "GetPublisherCpsGeneral Error , errcode=2009 , errmsg=invalid page"
        );
        assert_eq!(err.remote_code(), Some(2009));
    }

    #[test]
    fn token_client_build_failure_is_not_a_request_failure() {
        let source = reqwest::Client::builder()
            .user_agent("bad\nagent")
            .build()
            .unwrap_err();
        let err = TokenError::Client(source);
        assert!(err.to_string().starts_with("failed to build token HTTP client"));
        assert!(!err.to_string().contains("request"));
    }
}
