//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum that maps to HTTP status codes.

use serde::Serialize;

/// エラー種別の列挙体
///
/// ニュース取得 API が返しうるエラー分類を定義します。
/// クライアント起因 (4xx) と、サーバー・上流サービス起因 (5xx) を区別します。
///
/// ## Notes
/// * `TooManyRequests` は利用枠の超過であり、障害ではありません
/// * `BadGateway` / `GatewayTimeout` は外部サービス側の問題を表します
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::TooManyRequests;
/// assert_eq!(kind.status_code(), 429);
/// assert_eq!(kind.as_str(), "Too Many Requests");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - Bad Request: リクエストボディ・パラメータが不正
    BadRequest,
    /// 429 - Too Many Requests: 1日あたりの利用枠を超過
    TooManyRequests,
    /// 500 - Internal Server Error: 設定不備・レート制限ストア障害など
    InternalServerError,
    /// 502 - Bad Gateway: 検索・翻訳 API が不正な応答を返した
    BadGateway,
    /// 504 - Gateway Timeout: 上流 API がタイムアウト
    GatewayTimeout,
}

impl ErrorKind {
    /// HTTP ステータスコードを取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::BadRequest.status_code(), 400);
    /// assert_eq!(ErrorKind::BadGateway.status_code(), 502);
    /// ```
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::TooManyRequests => 429,
            ErrorKind::InternalServerError => 500,
            ErrorKind::BadGateway => 502,
            ErrorKind::GatewayTimeout => 504,
        }
    }

    /// HTTP ステータスの標準的な理由フレーズを取得
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::TooManyRequests => "Too Many Requests",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::BadGateway => "Bad Gateway",
            ErrorKind::GatewayTimeout => "Gateway Timeout",
        }
    }

    /// サーバー側 (5xx) のエラーかどうか
    ///
    /// これらのエラーはログに記録すべきです。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// クライアント側 (4xx) のエラーかどうか
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }

    /// 上流サービス (検索・翻訳 API) 起因のエラーかどうか
    #[inline]
    pub const fn is_upstream_error(&self) -> bool {
        matches!(self, ErrorKind::BadGateway | ErrorKind::GatewayTimeout)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::BadRequest.status_code(), 400);
        assert_eq!(ErrorKind::TooManyRequests.status_code(), 429);
        assert_eq!(ErrorKind::InternalServerError.status_code(), 500);
        assert_eq!(ErrorKind::BadGateway.status_code(), 502);
        assert_eq!(ErrorKind::GatewayTimeout.status_code(), 504);
    }

    #[test]
    fn test_quota_exceeded_is_client_error() {
        assert!(ErrorKind::TooManyRequests.is_client_error());
        assert!(!ErrorKind::TooManyRequests.is_server_error());
    }

    #[test]
    fn test_upstream_errors() {
        assert!(ErrorKind::BadGateway.is_upstream_error());
        assert!(ErrorKind::GatewayTimeout.is_upstream_error());
        assert!(!ErrorKind::InternalServerError.is_upstream_error());
        assert!(ErrorKind::BadGateway.is_server_error());
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorKind::TooManyRequests).unwrap();
        assert_eq!(json, r#""TOO_MANY_REQUESTS""#);
    }
}
