//! 触发器注册表
//!
//! 每个触发器对应一个 webhook 事件名和一条预定义调用链。

use std::fmt;
use std::str::FromStr;

use trigger_shared::error::TriggerError;

/// 支持的触发器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    ChargeCaptured,
    ChargeDisputed,
    ChargeFailed,
    ChargeRefunded,
    ChargeSucceeded,
    CheckoutSessionCompleted,
    CustomerCreated,
    CustomerUpdated,
    CustomerDeleted,
    CustomerSourceCreated,
    CustomerSourceUpdated,
    CustomerSubscriptionCreated,
    CustomerSubscriptionUpdated,
    CustomerSubscriptionDeleted,
    InvoiceCreated,
    InvoiceFinalized,
    InvoicePaymentSucceeded,
    InvoicePaymentFailed,
    InvoiceUpdated,
    PaymentIntentCreated,
    PaymentIntentSucceeded,
    PaymentIntentFailed,
    PaymentIntentCanceled,
    PaymentMethodAttached,
    ProductCreated,
}

impl Trigger {
    pub const ALL: [Trigger; 25] = [
        Self::ChargeCaptured,
        Self::ChargeDisputed,
        Self::ChargeFailed,
        Self::ChargeRefunded,
        Self::ChargeSucceeded,
        Self::CheckoutSessionCompleted,
        Self::CustomerCreated,
        Self::CustomerUpdated,
        Self::CustomerDeleted,
        Self::CustomerSourceCreated,
        Self::CustomerSourceUpdated,
        Self::CustomerSubscriptionCreated,
        Self::CustomerSubscriptionUpdated,
        Self::CustomerSubscriptionDeleted,
        Self::InvoiceCreated,
        Self::InvoiceFinalized,
        Self::InvoicePaymentSucceeded,
        Self::InvoicePaymentFailed,
        Self::InvoiceUpdated,
        Self::PaymentIntentCreated,
        Self::PaymentIntentSucceeded,
        Self::PaymentIntentFailed,
        Self::PaymentIntentCanceled,
        Self::PaymentMethodAttached,
        Self::ProductCreated,
    ];

    /// 触发的 webhook 事件名
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ChargeCaptured => "charge.captured",
            Self::ChargeDisputed => "charge.dispute.created",
            Self::ChargeFailed => "charge.failed",
            Self::ChargeRefunded => "charge.refunded",
            Self::ChargeSucceeded => "charge.succeeded",
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::CustomerCreated => "customer.created",
            Self::CustomerUpdated => "customer.updated",
            Self::CustomerDeleted => "customer.deleted",
            Self::CustomerSourceCreated => "customer.source.created",
            Self::CustomerSourceUpdated => "customer.source.updated",
            Self::CustomerSubscriptionCreated => "customer.subscription.created",
            Self::CustomerSubscriptionUpdated => "customer.subscription.updated",
            Self::CustomerSubscriptionDeleted => "customer.subscription.deleted",
            Self::InvoiceCreated => "invoice.created",
            Self::InvoiceFinalized => "invoice.finalized",
            Self::InvoicePaymentSucceeded => "invoice.payment_succeeded",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::InvoiceUpdated => "invoice.updated",
            Self::PaymentIntentCreated => "payment_intent.created",
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentFailed => "payment_intent.payment_failed",
            Self::PaymentIntentCanceled => "payment_intent.canceled",
            Self::PaymentMethodAttached => "payment_method.attached",
            Self::ProductCreated => "product.created",
        }
    }

    /// 通过事件名查找触发器
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.event_name() == name)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

impl FromStr for Trigger {
    type Err = TriggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_event_name(s).ok_or_else(|| TriggerError::UnknownTrigger {
            name: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_event_names_are_unique() {
        let names: HashSet<_> = Trigger::ALL.iter().map(Trigger::event_name).collect();
        assert_eq!(names.len(), Trigger::ALL.len());
    }

    #[test]
    fn test_from_event_name() {
        assert_eq!(
            "charge.captured".parse::<Trigger>().unwrap(),
            Trigger::ChargeCaptured
        );
        assert_eq!(
            Trigger::from_event_name("payment_intent.payment_failed"),
            Some(Trigger::PaymentIntentFailed)
        );
        assert_eq!(Trigger::ChargeDisputed.to_string(), "charge.dispute.created");
    }

    #[test]
    fn test_unknown_event_name() {
        let err = "charge.exploded".parse::<Trigger>().unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_TRIGGER");
        assert_eq!(err.to_string(), "Event charge.exploded is not supported");
    }
}
