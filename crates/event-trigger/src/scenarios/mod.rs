//! 场景模块
//!
//! 提供场景定义、通用执行器和预定义场景集合。
//!
//! # 模块结构
//!
//! - `scenario` - 场景定义（Scenario）、步骤（ScenarioStep）和构建器
//! - `runner` - 通用步骤执行器（ScenarioRunner）
//! - `predefined` - 每个触发器对应的标准场景
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use event_trigger::scenarios::{PredefinedScenarios, Scenario, ScenarioRunner};
//!
//! // 方式 1：使用预定义场景
//! let scenario = PredefinedScenarios::get("charge.captured").unwrap();
//!
//! // 方式 2：使用构建器
//! let custom = Scenario::builder("customer.updated")
//!     .post("create_customer", "/v1/customers", Vec::<String>::new())
//!     .capture("customer", "Customer")
//!     .post("update_customer", "/v1/customers/{{customer}}", ["metadata[foo]=bar"])
//!     .build();
//!
//! // 执行场景
//! // let runner = ScenarioRunner::new(&config, &executor);
//! // runner.run(&custom).await?;
//! ```

mod predefined;
mod runner;
mod scenario;

pub use predefined::PredefinedScenarios;
pub use runner::{ScenarioOutcome, ScenarioRunner};
pub use scenario::{Capture, Scenario, ScenarioBuilder, ScenarioStep};
