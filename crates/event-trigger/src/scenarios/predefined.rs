//! 预定义场景集合
//!
//! 每个触发器对应一条固定的调用链。调用顺序和参数必须与远端产生目标事件所需的
//! 操作完全一致，修改时同步更新 `engine_tests` 中的调用断言。

use super::scenario::{Scenario, ScenarioBuilder};
use crate::fixtures::{self, FundingSource, TestCard};
use crate::trigger::Trigger;

const NO_PARAMS: [&str; 0] = [];

/// 预定义场景集合
pub struct PredefinedScenarios;

impl PredefinedScenarios {
    /// 触发器对应的场景
    pub fn for_trigger(trigger: Trigger) -> Scenario {
        match trigger {
            Trigger::ChargeCaptured => Self::charge_captured(),
            Trigger::ChargeDisputed => Self::charge_disputed(),
            Trigger::ChargeFailed => Self::charge_failed(),
            Trigger::ChargeRefunded => Self::charge_refunded(),
            Trigger::ChargeSucceeded => Self::charge_succeeded(),
            Trigger::CheckoutSessionCompleted => Self::checkout_session_completed(),
            Trigger::CustomerCreated => Self::customer_created(),
            Trigger::CustomerUpdated => Self::customer_updated(),
            Trigger::CustomerDeleted => Self::customer_deleted(),
            Trigger::CustomerSourceCreated => Self::customer_source_created(),
            Trigger::CustomerSourceUpdated => Self::customer_source_updated(),
            Trigger::CustomerSubscriptionCreated => Self::customer_subscription_created(),
            Trigger::CustomerSubscriptionUpdated => Self::customer_subscription_updated(),
            Trigger::CustomerSubscriptionDeleted => Self::customer_subscription_deleted(),
            Trigger::InvoiceCreated => Self::invoice_created(),
            Trigger::InvoiceFinalized => Self::invoice_finalized(),
            Trigger::InvoicePaymentSucceeded => Self::invoice_payment_succeeded(),
            Trigger::InvoicePaymentFailed => Self::invoice_payment_failed(),
            Trigger::InvoiceUpdated => Self::invoice_updated(),
            Trigger::PaymentIntentCreated => Self::payment_intent_created(),
            Trigger::PaymentIntentSucceeded => Self::payment_intent_succeeded(),
            Trigger::PaymentIntentFailed => Self::payment_intent_failed(),
            Trigger::PaymentIntentCanceled => Self::payment_intent_canceled(),
            Trigger::PaymentMethodAttached => Self::payment_method_attached(),
            Trigger::ProductCreated => Self::product_created(),
        }
    }

    /// 获取所有预定义场景
    pub fn all() -> Vec<Scenario> {
        Trigger::ALL.into_iter().map(Self::for_trigger).collect()
    }

    /// 按事件名获取场景
    pub fn get(name: &str) -> Option<Scenario> {
        Trigger::from_event_name(name).map(Self::for_trigger)
    }

    // ---------------------------------------------------------------------
    // 扣款
    // ---------------------------------------------------------------------

    /// 创建未捕获的扣款，再单独捕获
    pub fn charge_captured() -> Scenario {
        Scenario::builder(Trigger::ChargeCaptured.event_name())
            .description("create an uncaptured charge, then capture it")
            .post(
                "create_charge",
                "/v1/charges",
                charge_params(FundingSource::Valid, false),
            )
            .capture("charge", "Charge")
            .post("capture_charge", "/v1/charges/{{charge}}/capture", NO_PARAMS)
            .build()
    }

    /// 使用争议令牌创建扣款
    pub fn charge_disputed() -> Scenario {
        single_charge(Trigger::ChargeDisputed, FundingSource::Dispute)
            .description("create a charge that is immediately disputed")
            .build()
    }

    /// 使用拒付令牌创建扣款
    pub fn charge_failed() -> Scenario {
        single_charge(Trigger::ChargeFailed, FundingSource::Declined)
            .description("fail to create a charge")
            .build()
    }

    /// 创建扣款后全额退款
    pub fn charge_refunded() -> Scenario {
        Scenario::builder(Trigger::ChargeRefunded.event_name())
            .description("create a charge, then refund it")
            .post(
                "create_charge",
                "/v1/charges",
                charge_params(FundingSource::Valid, true),
            )
            .capture("charge", "Charge")
            .post("create_refund", "/v1/refunds", ["charge={{charge}}"])
            .build()
    }

    pub fn charge_succeeded() -> Scenario {
        single_charge(Trigger::ChargeSucceeded, FundingSource::Valid)
            .description("successfully create a charge")
            .build()
    }

    // ---------------------------------------------------------------------
    // Checkout
    // ---------------------------------------------------------------------

    /// 创建并完成 Checkout 会话
    ///
    /// 会话和支付方式分别创建，最后一步才汇合：
    /// 1. 创建 Checkout 会话
    /// 2. 按会话 ID 查询支付页（未公开接口 GET /v1/payment_pages）
    /// 3. 用测试令牌创建支付方式
    /// 4. 用支付方式确认支付页（未公开接口 POST /v1/payment_pages/<id>/confirm）
    pub fn checkout_session_completed() -> Scenario {
        Scenario::builder(Trigger::CheckoutSessionCompleted.event_name())
            .description("create and complete a Checkout session")
            .post(
                "create_checkout_session",
                "/v1/checkout/sessions",
                [
                    "success_url=https://httpbin.org/post",
                    "cancel_url=https://httpbin.org/post",
                    "payment_method_types[]=card",
                    "line_items[][name]=T-shirt",
                    "line_items[][description]=Comfortable cotton t-shirt",
                    "line_items[][amount]=1500",
                    "line_items[][currency]=usd",
                    "line_items[][quantity]=2",
                ],
            )
            .capture("session", "CheckoutSession")
            .get(
                "retrieve_payment_page",
                "/v1/payment_pages",
                ["session_id={{session}}"],
            )
            .capture("payment_page", "PaymentPage")
            .post(
                "create_payment_method",
                "/v1/payment_methods",
                fixtures::token_payment_method_params(FundingSource::Valid),
            )
            .capture("payment_method", "PaymentMethod")
            .post(
                "confirm_payment_page",
                "/v1/payment_pages/{{payment_page}}/confirm",
                ["payment_method={{payment_method}}"],
            )
            .build()
    }

    // ---------------------------------------------------------------------
    // 客户
    // ---------------------------------------------------------------------

    pub fn customer_created() -> Scenario {
        Scenario::builder(Trigger::CustomerCreated.event_name())
            .description("create a new customer")
            .post("create_customer", "/v1/customers", NO_PARAMS)
            .build()
    }

    /// 创建客户后添加元数据
    pub fn customer_updated() -> Scenario {
        with_customer(Trigger::CustomerUpdated, None)
            .description("create a customer, then add metadata to it")
            .post(
                "update_customer",
                "/v1/customers/{{customer}}",
                ["metadata[foo]=bar"],
            )
            .build()
    }

    pub fn customer_deleted() -> Scenario {
        with_customer(Trigger::CustomerDeleted, None)
            .description("create a customer, then delete it")
            .delete("delete_customer", "/v1/customers/{{customer}}")
            .build()
    }

    /// 创建客户后绑定卡片
    pub fn customer_source_created() -> Scenario {
        with_customer(Trigger::CustomerSourceCreated, None)
            .description("create a customer, then attach a card to it")
            .post(
                "attach_source",
                "/v1/customers/{{customer}}/sources",
                [FundingSource::Valid.source_param()],
            )
            .build()
    }

    /// 绑定卡片后更新卡片元数据
    pub fn customer_source_updated() -> Scenario {
        with_customer(Trigger::CustomerSourceUpdated, None)
            .description("create a customer, attach a card, then add metadata to the card")
            .post(
                "attach_source",
                "/v1/customers/{{customer}}/sources",
                [FundingSource::Valid.source_param()],
            )
            .capture("card", "Card")
            .post(
                "update_source",
                "/v1/customers/{{customer}}/sources/{{card}}",
                ["metadata[foo]=bar"],
            )
            .build()
    }

    // ---------------------------------------------------------------------
    // 订阅
    // ---------------------------------------------------------------------

    pub fn customer_subscription_created() -> Scenario {
        with_subscription(Trigger::CustomerSubscriptionCreated, false)
            .description("create a customer with a card and a plan, then subscribe the customer")
            .build()
    }

    pub fn customer_subscription_updated() -> Scenario {
        with_subscription(Trigger::CustomerSubscriptionUpdated, true)
            .description("subscribe a new customer to a new plan, then update the subscription")
            .post(
                "update_subscription",
                "/v1/subscriptions/{{subscription}}",
                ["metadata[foo]=bar"],
            )
            .build()
    }

    pub fn customer_subscription_deleted() -> Scenario {
        with_subscription(Trigger::CustomerSubscriptionDeleted, true)
            .description("subscribe a new customer to a new plan, then delete the subscription")
            .delete("delete_subscription", "/v1/subscriptions/{{subscription}}")
            .build()
    }

    // ---------------------------------------------------------------------
    // 账单
    // ---------------------------------------------------------------------

    pub fn invoice_created() -> Scenario {
        with_invoice(Trigger::InvoiceCreated, None, false)
            .description("create a customer and an invoice item, then create the invoice")
            .build()
    }

    pub fn invoice_finalized() -> Scenario {
        with_invoice(Trigger::InvoiceFinalized, None, true)
            .description("create an invoice, then finalize it")
            .post("finalize_invoice", "/v1/invoices/{{invoice}}/finalize", NO_PARAMS)
            .build()
    }

    pub fn invoice_payment_succeeded() -> Scenario {
        with_invoice(Trigger::InvoicePaymentSucceeded, Some(FundingSource::Valid), true)
            .description("create an invoice for a customer with a valid card, then pay it")
            .post("pay_invoice", "/v1/invoices/{{invoice}}/pay", NO_PARAMS)
            .build()
    }

    /// 客户绑定的卡可以保存但扣款必然失败，支付账单时产生失败事件
    pub fn invoice_payment_failed() -> Scenario {
        with_invoice(
            Trigger::InvoicePaymentFailed,
            Some(FundingSource::CustomerChargeFail),
            true,
        )
        .description("create an invoice for a customer whose card fails, then try to pay it")
        .post("pay_invoice", "/v1/invoices/{{invoice}}/pay", NO_PARAMS)
        .build()
    }

    pub fn invoice_updated() -> Scenario {
        with_invoice(Trigger::InvoiceUpdated, None, true)
            .description("create an invoice, then add metadata to it")
            .post(
                "update_invoice",
                "/v1/invoices/{{invoice}}",
                ["metadata[foo]=bar"],
            )
            .build()
    }

    // ---------------------------------------------------------------------
    // 支付意图与支付方式
    // ---------------------------------------------------------------------

    pub fn payment_intent_created() -> Scenario {
        Scenario::builder(Trigger::PaymentIntentCreated.event_name())
            .description("create a payment intent")
            .post("create_payment_intent", "/v1/payment_intents", payment_intent_params())
            .build()
    }

    pub fn payment_intent_succeeded() -> Scenario {
        confirmed_payment_intent(Trigger::PaymentIntentSucceeded, TestCard::Visa)
            .description("create a payment method, then confirm a payment intent with it")
            .build()
    }

    /// 使用必然被拒的卡号确认支付意图
    pub fn payment_intent_failed() -> Scenario {
        confirmed_payment_intent(Trigger::PaymentIntentFailed, TestCard::Declined)
            .description("confirm a payment intent with a card that is declined")
            .build()
    }

    pub fn payment_intent_canceled() -> Scenario {
        Scenario::builder(Trigger::PaymentIntentCanceled.event_name())
            .description("create a payment intent, then cancel it")
            .post("create_payment_intent", "/v1/payment_intents", payment_intent_params())
            .capture("payment_intent", "PaymentIntent")
            .post(
                "cancel_payment_intent",
                "/v1/payment_intents/{{payment_intent}}/cancel",
                NO_PARAMS,
            )
            .build()
    }

    /// 客户和支付方式各自创建，最后把支付方式绑定到客户
    pub fn payment_method_attached() -> Scenario {
        with_customer(Trigger::PaymentMethodAttached, None)
            .description("create a customer and a payment method, then attach them")
            .post(
                "create_payment_method",
                "/v1/payment_methods",
                TestCard::Visa.payment_method_params(),
            )
            .capture("payment_method", "PaymentMethod")
            .post(
                "attach_payment_method",
                "/v1/payment_methods/{{payment_method}}/attach",
                ["customer={{customer}}"],
            )
            .build()
    }

    pub fn product_created() -> Scenario {
        Scenario::builder(Trigger::ProductCreated.event_name())
            .description("create a product")
            .post("create_product", "/v1/products", ["name=myproduct"])
            .build()
    }
}

// ---------------------------------------------------------------------------
// 公共调用链片段
// ---------------------------------------------------------------------------

fn charge_params(source: FundingSource, capture: bool) -> Vec<String> {
    let mut params = vec!["amount=2000".to_string(), "currency=usd".to_string()];
    if !capture {
        params.push("capture=false".to_string());
    }
    params.push(source.source_param());
    params
}

fn single_charge(trigger: Trigger, source: FundingSource) -> ScenarioBuilder {
    Scenario::builder(trigger.event_name()).post(
        "create_charge",
        "/v1/charges",
        charge_params(source, true),
    )
}

fn payment_intent_params() -> Vec<String> {
    vec![
        "amount=2000".to_string(),
        "currency=usd".to_string(),
        "payment_method_types[]=card".to_string(),
    ]
}

/// 创建客户并捕获为 `customer`，`source` 为 None 时不绑定资金来源
fn with_customer(trigger: Trigger, source: Option<FundingSource>) -> ScenarioBuilder {
    let params: Vec<String> = source.map(|s| s.source_param()).into_iter().collect();
    Scenario::builder(trigger.event_name())
        .post("create_customer", "/v1/customers", params)
        .capture("customer", "Customer")
}

/// 带卡客户 + 月付计划 + 订阅
fn with_subscription(trigger: Trigger, capture_subscription: bool) -> ScenarioBuilder {
    let builder = with_customer(trigger, Some(FundingSource::Valid))
        .post("create_plan", "/v1/plans", fixtures::monthly_plan_params())
        .capture("plan", "Plan")
        .post(
            "create_subscription",
            "/v1/subscriptions",
            ["items[0][plan]={{plan}}", "customer={{customer}}"],
        );

    if capture_subscription {
        builder.capture("subscription", "Subscription")
    } else {
        builder
    }
}

/// 客户 + 账单项 + 账单
///
/// 资金来源决定后续支付账单时产生成功还是失败事件。
fn with_invoice(
    trigger: Trigger,
    source: Option<FundingSource>,
    capture_invoice: bool,
) -> ScenarioBuilder {
    let builder = with_customer(trigger, source)
        .post(
            "create_invoice_item",
            "/v1/invoiceitems",
            ["currency=usd", "customer={{customer}}", "amount=2000"],
        )
        .post("create_invoice", "/v1/invoices", ["customer={{customer}}"]);

    if capture_invoice {
        builder.capture("invoice", "Invoice")
    } else {
        builder
    }
}

/// 按卡号创建支付方式，再创建并立即确认支付意图
fn confirmed_payment_intent(trigger: Trigger, card: TestCard) -> ScenarioBuilder {
    let mut intent_params = payment_intent_params();
    intent_params.push("confirm=true".to_string());
    intent_params.push("payment_method={{payment_method}}".to_string());

    Scenario::builder(trigger.event_name())
        .post(
            "create_payment_method",
            "/v1/payment_methods",
            card.payment_method_params(),
        )
        .capture("payment_method", "PaymentMethod")
        .post("create_payment_intent", "/v1/payment_intents", intent_params)
}
