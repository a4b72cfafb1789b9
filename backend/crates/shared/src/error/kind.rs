//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum: the stable, machine-checkable taxonomy
//! every client-side failure is classified into.

use serde::{Deserialize, Serialize};

/// エラー種別の列挙体
///
/// クライアント側で発生するすべての失敗を分類します。
/// `code()` はシリアライズ形式と同じ安定した識別子を返します。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::PollExhausted;
/// assert_eq!(kind.code(), "POLL_EXHAUSTED");
/// assert_eq!(kind.as_str(), "Poll Exhausted");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 呼び出し側の誤用（画像なし、認証情報が不正など）
    Precondition,
    /// 認証情報の交換に失敗
    AuthenticationFailed,
    /// トークンが存在しない、または無効化された
    Unauthenticated,
    /// 未完了のタスクが存在する
    TaskInProgress,
    /// ジオメトリ文字列の形式が不正
    MalformedGeometry,
    /// 単一ポイント以外のジオメトリ
    UnsupportedGeometryType,
    /// レコードの値が不変条件に違反
    InvalidRecord,
    /// レスポンスボディを解釈できない
    MalformedResponse,
    /// バックエンドが解析失敗を報告
    AnalysisFailed,
    /// 一時的な失敗の再試行回数を超過
    PollExhausted,
    /// サーバーが 2xx 以外を返した
    ServerRejected,
    /// 一時的なネットワーク障害
    Transport,
    /// リセットにより操作が破棄された
    Cancelled,
    /// 内部エラー
    Internal,
}

impl ErrorKind {
    /// 安定した機械判読用コードを取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::TaskInProgress.code(), "TASK_IN_PROGRESS");
    /// ```
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorKind::Precondition => "PRECONDITION",
            ErrorKind::AuthenticationFailed => "AUTHENTICATION_FAILED",
            ErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ErrorKind::TaskInProgress => "TASK_IN_PROGRESS",
            ErrorKind::MalformedGeometry => "MALFORMED_GEOMETRY",
            ErrorKind::UnsupportedGeometryType => "UNSUPPORTED_GEOMETRY_TYPE",
            ErrorKind::InvalidRecord => "INVALID_RECORD",
            ErrorKind::MalformedResponse => "MALFORMED_RESPONSE",
            ErrorKind::AnalysisFailed => "ANALYSIS_FAILED",
            ErrorKind::PollExhausted => "POLL_EXHAUSTED",
            ErrorKind::ServerRejected => "SERVER_REJECTED",
            ErrorKind::Transport => "TRANSPORT",
            ErrorKind::Cancelled => "CANCELLED",
            ErrorKind::Internal => "INTERNAL",
        }
    }

    /// ユーザー向けの文字列表現を取得
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Precondition => "Precondition Failed",
            ErrorKind::AuthenticationFailed => "Authentication Failed",
            ErrorKind::Unauthenticated => "Unauthenticated",
            ErrorKind::TaskInProgress => "Task In Progress",
            ErrorKind::MalformedGeometry => "Malformed Geometry",
            ErrorKind::UnsupportedGeometryType => "Unsupported Geometry Type",
            ErrorKind::InvalidRecord => "Invalid Record",
            ErrorKind::MalformedResponse => "Malformed Response",
            ErrorKind::AnalysisFailed => "Analysis Failed",
            ErrorKind::PollExhausted => "Poll Exhausted",
            ErrorKind::ServerRejected => "Server Rejected",
            ErrorKind::Transport => "Transport Error",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::Internal => "Internal Error",
        }
    }

    /// 自動再試行の対象かどうかを判定
    ///
    /// ポーリング中の一時的な障害のみが `true` を返します。
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Transport)
    }

    /// 再ログインが必要かどうかを判定
    #[inline]
    pub const fn requires_reauth(&self) -> bool {
        matches!(
            self,
            ErrorKind::AuthenticationFailed | ErrorKind::Unauthenticated
        )
    }

    /// 呼び出し側の誤用に起因するエラーかどうかを判定
    ///
    /// トークン欠如（`Unauthenticated`）も前提条件違反として扱います。
    #[inline]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, ErrorKind::Precondition | ErrorKind::Unauthenticated)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_serde() {
        let kinds = [
            ErrorKind::Precondition,
            ErrorKind::AuthenticationFailed,
            ErrorKind::Unauthenticated,
            ErrorKind::TaskInProgress,
            ErrorKind::MalformedGeometry,
            ErrorKind::UnsupportedGeometryType,
            ErrorKind::InvalidRecord,
            ErrorKind::MalformedResponse,
            ErrorKind::AnalysisFailed,
            ErrorKind::PollExhausted,
            ErrorKind::ServerRejected,
            ErrorKind::Transport,
            ErrorKind::Cancelled,
            ErrorKind::Internal,
        ];
        for kind in kinds {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.code()));
            let back: ErrorKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::Transport.is_retryable());
        assert!(!ErrorKind::PollExhausted.is_retryable());
        assert!(!ErrorKind::MalformedGeometry.is_retryable());
        assert!(!ErrorKind::ServerRejected.is_retryable());
    }

    #[test]
    fn test_requires_reauth() {
        assert!(ErrorKind::Unauthenticated.requires_reauth());
        assert!(ErrorKind::AuthenticationFailed.requires_reauth());
        assert!(!ErrorKind::TaskInProgress.requires_reauth());
    }

    #[test]
    fn test_is_precondition() {
        assert!(ErrorKind::Precondition.is_precondition());
        assert!(ErrorKind::Unauthenticated.is_precondition());
        assert!(!ErrorKind::AuthenticationFailed.is_precondition());
    }
}
