//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// アプリケーション統一エラー型
///
/// オペレーターに提示するための標準エラー型です。
/// ビルダーパターンを使用してエラーを構築できます。
///
/// ## Fields
/// * `kind` - エラーの分類
/// * `message` - ユーザー向けのエラーメッセージ
/// * `action` - ユーザーが取るべきアクション（オプション）
/// * `source` - 元のエラー（オプション、デバッグ用）
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// // シンプルなエラー
/// let err = AppError::new(ErrorKind::TaskInProgress, "A task is already running");
///
/// // 詳細なエラー
/// let err = AppError::unauthenticated("No bearer token")
///     .with_action("Please log in again");
/// ```
pub struct AppError {
    /// エラー種別
    kind: ErrorKind,
    /// ユーザー向けメッセージ
    message: Cow<'static, str>,
    /// ユーザーが取るべきアクション
    action: Option<Cow<'static, str>>,
    /// 元のエラー（デバッグ用）
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// アプリケーション結果型エイリアス
///
/// `Result<T, AppError>` の省略形です。
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// 新しいエラーを作成
    ///
    /// ## Arguments
    /// * `kind` - エラー種別
    /// * `message` - ユーザー向けメッセージ
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            source: None,
        }
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// 前提条件違反エラー
    #[inline]
    pub fn precondition(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Precondition, message)
    }

    /// 認証失敗エラー
    #[inline]
    pub fn authentication_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::AuthenticationFailed, message)
    }

    /// 未認証エラー
    #[inline]
    pub fn unauthenticated(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    /// 重複送信エラー
    #[inline]
    pub fn task_in_progress(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::TaskInProgress, message)
    }

    /// サーバー拒否エラー
    #[inline]
    pub fn server_rejected(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServerRejected, message)
    }

    /// レスポンス解釈エラー
    #[inline]
    pub fn malformed_response(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    /// 一時的なネットワーク障害
    #[inline]
    pub fn transport(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// 内部エラー
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// ユーザー向けアクションを設定
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::app_error::AppError;
    /// let err = AppError::task_in_progress("Analysis still running")
    ///     .with_action("Reset the current task first");
    /// ```
    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// 元のエラーを設定（デバッグ用）
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::app_error::{AppError, AppResult};
    ///
    /// fn read_image() -> AppResult<Vec<u8>> {
    ///     std::fs::read("drone.jpg")
    ///         .map_err(|e| AppError::precondition("Failed to read image").with_source(e))
    /// }
    /// ```
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// エラー種別を取得
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 機械判読用コードを取得
    #[inline]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// メッセージを取得
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// アクションを取得
    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// 再試行可能かどうか
    #[inline]
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// 再ログインが必要かどうか
    #[inline]
    pub fn requires_reauth(&self) -> bool {
        self.kind.requires_reauth()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(action) = &self.action {
            builder.field("action", action);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

// ============================================================================
// Result extension traits
// ============================================================================

/// `Result<T, E>` を `AppResult<T>` に変換するための拡張トレイト
pub trait ResultExt<T, E> {
    /// エラーを `AppError` に変換し、指定した種別とメッセージでラップ
    fn map_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn map_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static,
    {
        self.map_err(|e| AppError::new(kind, message).with_source(e))
    }
}

/// `Option<T>` を `AppResult<T>` に変換するための拡張トレイト
pub trait OptionExt<T> {
    /// `None` の場合に `AppError` を返す
    fn ok_or_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T> {
        self.ok_or_else(|| AppError::new(kind, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::PollExhausted, "Gave up polling");
        assert_eq!(err.kind(), ErrorKind::PollExhausted);
        assert_eq!(err.code(), "POLL_EXHAUSTED");
        assert_eq!(err.message(), "Gave up polling");
        assert!(err.action().is_none());
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(AppError::precondition("t").kind(), ErrorKind::Precondition);
        assert_eq!(
            AppError::authentication_failed("t").kind(),
            ErrorKind::AuthenticationFailed
        );
        assert_eq!(
            AppError::unauthenticated("t").kind(),
            ErrorKind::Unauthenticated
        );
        assert_eq!(
            AppError::task_in_progress("t").kind(),
            ErrorKind::TaskInProgress
        );
        assert_eq!(
            AppError::server_rejected("t").kind(),
            ErrorKind::ServerRejected
        );
        assert_eq!(
            AppError::malformed_response("t").kind(),
            ErrorKind::MalformedResponse
        );
        assert_eq!(AppError::transport("t").kind(), ErrorKind::Transport);
        assert_eq!(AppError::internal("t").kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_with_action() {
        let err = AppError::unauthenticated("Token missing").with_action("Please log in");
        assert_eq!(err.action(), Some("Please log in"));
        assert!(err.requires_reauth());
    }

    #[test]
    fn test_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AppError::precondition("Failed to read image").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display() {
        let err = AppError::task_in_progress("Already running");
        assert_eq!(err.to_string(), "[Task In Progress] Already running");

        let err_with_action = AppError::unauthenticated("No token").with_action("Log in");
        assert!(err_with_action.to_string().contains("Action:"));
    }

    #[test]
    fn test_result_ext() {
        let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "not found",
        ));
        let app_result = result.map_app_err(ErrorKind::Precondition, "Image not readable");
        assert_eq!(app_result.unwrap_err().kind(), ErrorKind::Precondition);
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let result = none.ok_or_app_err(ErrorKind::Internal, "Task ended without an outcome");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Internal);

        let some: Option<i32> = Some(42);
        assert_eq!(some.ok_or_app_err(ErrorKind::Internal, "unused").unwrap(), 42);
    }
}
