use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::payments::{PaymentCallbackUpdateEntity, PaymentEntity};

#[async_trait]
#[automock]
pub trait PaymentRepository {
    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>>;
    async fn apply_callback_update(
        &self,
        payment_id: Uuid,
        changes: PaymentCallbackUpdateEntity,
    ) -> Result<()>;
}
