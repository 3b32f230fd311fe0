//! 测试资金来源与卡号
//!
//! 同一条调用链换用不同的资金来源，会在远端产生不同的最终 webhook 事件。
//! 这里把这些测试令牌收拢为封闭枚举，每个变体说明它触发的结果。

use serde::{Deserialize, Serialize};

/// 测试资金来源令牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingSource {
    /// 正常扣款成功的 Visa 卡
    Valid,
    /// 创建扣款时直接被拒，产生 `charge.failed`
    Declined,
    /// 扣款成功后立即发起争议，产生 `charge.dispute.created`
    Dispute,
    /// 可以绑定到客户，但后续扣款失败，用于 `invoice.payment_failed`
    CustomerChargeFail,
}

impl FundingSource {
    pub const ALL: [FundingSource; 4] = [
        Self::Valid,
        Self::Declined,
        Self::Dispute,
        Self::CustomerChargeFail,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Self::Valid => "tok_visa",
            Self::Declined => "tok_chargeDeclined",
            Self::Dispute => "tok_createDisputeInquiry",
            Self::CustomerChargeFail => "tok_chargeCustomerFail",
        }
    }

    /// 触发的结果说明，用于 `describe` 输出
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Valid => "charge succeeds",
            Self::Declined => "charge is declined",
            Self::Dispute => "charge succeeds and is disputed",
            Self::CustomerChargeFail => "attaches to a customer, later charges fail",
        }
    }

    /// `source=<token>` 参数
    pub fn source_param(&self) -> String {
        format!("source={}", self.token())
    }

    /// 通过令牌反查资金来源
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.token() == token)
    }
}

/// 测试卡号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCard {
    /// 支付成功
    Visa,
    /// 确认支付时被拒
    Declined,
}

/// 卡片有效期与 CVC
const CARD_EXP_MONTH: &str = "12";
const CARD_EXP_YEAR: &str = "2020";
const CARD_CVC: &str = "123";

impl TestCard {
    pub fn number(&self) -> &'static str {
        match self {
            Self::Visa => "4242424242424242",
            Self::Declined => "4000000000000002",
        }
    }

    /// 以原始卡号创建 PaymentMethod 的参数
    pub fn payment_method_params(&self) -> Vec<String> {
        vec![
            "type=card".to_string(),
            format!("card[number]={}", self.number()),
            format!("card[exp_month]={CARD_EXP_MONTH}"),
            format!("card[exp_year]={CARD_EXP_YEAR}"),
            format!("card[cvc]={CARD_CVC}"),
        ]
    }
}

/// 以令牌创建 PaymentMethod 的参数
pub fn token_payment_method_params(source: FundingSource) -> Vec<String> {
    vec![
        "type=card".to_string(),
        format!("card[token]={}", source.token()),
        "billing_details[email]=stripe@example.com".to_string(),
    ]
}

/// 月付订阅计划参数
pub fn monthly_plan_params() -> Vec<String> {
    vec![
        "currency=usd".to_string(),
        "interval=month".to_string(),
        "amount=2000".to_string(),
        "product[name]=myproduct".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_funding_source_tokens() {
        assert_eq!(FundingSource::Valid.token(), "tok_visa");
        assert_eq!(FundingSource::Declined.token(), "tok_chargeDeclined");
        assert_eq!(FundingSource::Dispute.token(), "tok_createDisputeInquiry");
        assert_eq!(
            FundingSource::CustomerChargeFail.token(),
            "tok_chargeCustomerFail"
        );
        assert_eq!(FundingSource::Declined.source_param(), "source=tok_chargeDeclined");
    }

    #[test]
    fn test_from_token_round_trips_every_source() {
        for source in FundingSource::ALL {
            assert_eq!(FundingSource::from_token(source.token()), Some(source));
            assert!(!source.outcome().is_empty());
        }
        assert_eq!(FundingSource::from_token("tok_unknown"), None);
    }

    #[test]
    fn test_payment_method_params() {
        let params = TestCard::Declined.payment_method_params();
        assert_eq!(
            params,
            vec![
                "type=card",
                "card[number]=4000000000000002",
                "card[exp_month]=12",
                "card[exp_year]=2020",
                "card[cvc]=123",
            ]
        );

        let params = token_payment_method_params(FundingSource::Valid);
        assert_eq!(params[1], "card[token]=tok_visa");
    }
}
