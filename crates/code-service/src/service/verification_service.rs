//! 码核验服务
//!
//! 处理用户提交的核验请求：
//! - 请求校验（失败时不访问存储）
//! - 单条条件更新完成 Unused -> Used 转换
//! - 码不存在与已使用返回同一提示，防止探测有效码
//!
//! 并发安全完全依赖存储层的条件更新，服务内不加锁。

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, instrument};
use verifier_shared::observability::metrics;
use verifier_shared::observability::tracing::mask_mobile;

use super::dto::{VerifyOutcome, VerifyRequest, messages};
use super::validation::validate_verify_request;
use super::with_timeout;
use crate::error::{CodeError, Result};
use crate::models::CodeVerification;
use crate::repository::CodeRepositoryTrait;

/// 码核验服务
pub struct VerificationService {
    code_repo: Arc<dyn CodeRepositoryTrait>,
    storage_timeout: Duration,
}

impl VerificationService {
    pub fn new(code_repo: Arc<dyn CodeRepositoryTrait>, storage_timeout: Duration) -> Self {
        Self {
            code_repo,
            storage_timeout,
        }
    }

    /// 核验产品码，返回可直接渲染的结果
    ///
    /// 所有错误都在这里转换为用户文案，系统错误只记录日志
    pub async fn verify(&self, request: &VerifyRequest) -> VerifyOutcome {
        let started = Instant::now();
        let result = self.try_verify(request).await;
        let elapsed = started.elapsed().as_secs_f64();

        match result {
            Ok(_) => {
                metrics::record_verification("verified", elapsed);
                VerifyOutcome::success(messages::VERIFIED)
            }
            Err(err) => {
                let label = match &err {
                    CodeError::Validation(_) => "invalid",
                    CodeError::CodeUnavailable => "rejected",
                    _ => "error",
                };
                if !err.is_business_error() {
                    error!(error = %err, code = err.error_code(), "Code verification failed");
                }
                metrics::record_verification(label, elapsed);
                VerifyOutcome::failure(err.user_message())
            }
        }
    }

    /// 核验产品码
    ///
    /// 1. 校验并清洗输入
    /// 2. 条件更新：code 匹配且状态为 Unused 时写入 Used、手机号、渠道与核验时间
    /// 3. 未命中返回 CodeUnavailable
    #[instrument(skip(self, request), fields(code = %request.code.trim()))]
    pub async fn try_verify(&self, request: &VerifyRequest) -> Result<CodeVerification> {
        let verification = validate_verify_request(request)?;

        let matched = with_timeout(
            self.storage_timeout,
            "mark_used",
            self.code_repo.mark_used(&verification),
        )
        .await?;

        if !matched {
            info!(code = %verification.code, "Code invalid or already verified");
            return Err(CodeError::CodeUnavailable);
        }

        info!(
            code = %verification.code,
            mobile = %mask_mobile(&verification.mobile),
            purchase_source = %verification.purchase_source,
            "Code verified"
        );

        Ok(verification)
    }
}
