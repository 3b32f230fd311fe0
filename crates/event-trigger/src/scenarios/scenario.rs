//! 场景定义
//!
//! 场景是一组按顺序执行的 API 调用步骤。后续步骤通过 `{{binding}}` 占位符引用
//! 前面步骤捕获的字段值，例如 `customer={{customer}}`。
//! 场景可以序列化为 JSON/YAML，便于从文件加载自定义场景。

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use trigger_shared::error::{Result, TriggerError};

use crate::request::HttpMethod;

/// 匹配 {{binding}} 格式，名称支持字母、数字、下划线
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());

// ---------------------------------------------------------------------------
// 场景定义
// ---------------------------------------------------------------------------

/// 场景定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// 场景名称，预定义场景使用 webhook 事件名（如 `charge.captured`）
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// 从 JSON 字符串解析场景
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TriggerError::ScenarioFormat(e.to_string()))
    }

    /// 从 YAML 字符串解析场景
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| TriggerError::ScenarioFormat(e.to_string()))
    }

    /// 根据扩展名从文件加载场景（.json / .yaml / .yml）
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            other => Err(TriggerError::ScenarioFormat(format!(
                "unsupported scenario file extension {:?}, expected json, yaml or yml",
                other.unwrap_or("")
            ))),
        }
    }

    /// 将场景序列化为 JSON 字符串
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TriggerError::ScenarioFormat(e.to_string()))
    }

    /// 将场景序列化为 YAML 字符串
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| TriggerError::ScenarioFormat(e.to_string()))
    }

    /// 创建新场景的构建器
    pub fn builder(name: impl Into<String>) -> ScenarioBuilder {
        ScenarioBuilder::new(name)
    }

    /// 校验场景结构
    ///
    /// - 至少包含一个步骤
    /// - 路径以 `/` 开头
    /// - 每个占位符都引用了更早步骤捕获的值
    /// - 捕获名不重复
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("scenario name is empty"));
        }
        if self.steps.is_empty() {
            return Err(self.invalid("scenario has no steps"));
        }

        let mut available: HashSet<&str> = HashSet::new();
        for (index, step) in self.steps.iter().enumerate() {
            if !step.path.starts_with('/') {
                return Err(self.invalid(format!(
                    "step {} ({}) path '{}' must start with '/'",
                    index, step.name, step.path
                )));
            }

            for reference in step.references() {
                if !available.contains(reference.as_str()) {
                    return Err(self.invalid(format!(
                        "step {} ({}) references '{{{{{}}}}}' before it is captured",
                        index, step.name, reference
                    )));
                }
            }

            if let Some(capture) = &step.capture
                && !available.insert(capture.binding.as_str())
            {
                return Err(self.invalid(format!(
                    "step {} ({}) captures '{}' more than once",
                    index, step.name, capture.binding
                )));
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> TriggerError {
        TriggerError::InvalidScenario {
            scenario: self.name.clone(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// 场景步骤
// ---------------------------------------------------------------------------

/// 场景步骤：一次 HTTP 调用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// 步骤名称，用于日志（如 `create_charge`）
    pub name: String,
    pub method: HttpMethod,
    /// 路径模板，如 `/v1/charges/{{charge}}/capture`
    pub path: String,
    /// 参数模板，`key=value` 形式，按顺序发送
    #[serde(default)]
    pub params: Vec<String>,
    /// 后续步骤需要本步骤响应中的字段时设置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<Capture>,
}

impl ScenarioStep {
    /// 路径和参数中引用的全部占位符名称
    pub fn references(&self) -> Vec<String> {
        std::iter::once(self.path.as_str())
            .chain(self.params.iter().map(String::as_str))
            .flat_map(|template| PLACEHOLDER.captures_iter(template))
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// 渲染路径
    pub(crate) fn render_path(&self, bindings: &HashMap<String, String>) -> Result<String> {
        self.render(&self.path, bindings)
    }

    /// 渲染参数列表，保持原始顺序
    pub(crate) fn render_params(&self, bindings: &HashMap<String, String>) -> Result<Vec<String>> {
        self.params
            .iter()
            .map(|template| self.render(template, bindings))
            .collect()
    }

    /// 替换占位符
    ///
    /// 找不到的占位符一律报错，不保留原样也不替换为空值。
    fn render(&self, template: &str, bindings: &HashMap<String, String>) -> Result<String> {
        let mut rendered = String::with_capacity(template.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(template) {
            let Some(whole) = caps.get(0) else { continue };
            let name = &caps[1];
            let value = bindings
                .get(name)
                .ok_or_else(|| TriggerError::InvalidScenario {
                    scenario: self.name.clone(),
                    reason: format!("unresolved placeholder '{{{{{name}}}}}'"),
                })?;
            rendered.push_str(&template[last..whole.start()]);
            rendered.push_str(value);
            last = whole.end();
        }

        rendered.push_str(&template[last..]);
        Ok(rendered)
    }
}

/// 从响应中捕获字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    /// 后续步骤引用时使用的名称
    #[serde(rename = "as")]
    pub binding: String,
    /// 对象名称，用于错误消息（如 `CheckoutSession`）
    pub object: String,
    #[serde(default = "default_capture_field")]
    pub field: String,
}

fn default_capture_field() -> String {
    "id".to_string()
}

impl Capture {
    /// 捕获 `id` 字段
    pub fn id(binding: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            binding: binding.into(),
            object: object.into(),
            field: default_capture_field(),
        }
    }
}

// ---------------------------------------------------------------------------
// 场景构建器
// ---------------------------------------------------------------------------

/// 场景构建器
///
/// 提供流式 API 来构建场景，比直接构造 Scenario 更直观。
pub struct ScenarioBuilder {
    name: String,
    description: String,
    steps: Vec<ScenarioStep>,
}

impl ScenarioBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            steps: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn step(mut self, step: ScenarioStep) -> Self {
        self.steps.push(step);
        self
    }

    fn call<I, S>(self, method: HttpMethod, name: &str, path: &str, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.step(ScenarioStep {
            name: name.to_string(),
            method,
            path: path.to_string(),
            params: params.into_iter().map(Into::into).collect(),
            capture: None,
        })
    }

    pub fn get<I, S>(self, name: &str, path: &str, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.call(HttpMethod::Get, name, path, params)
    }

    pub fn post<I, S>(self, name: &str, path: &str, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.call(HttpMethod::Post, name, path, params)
    }

    pub fn delete(self, name: &str, path: &str) -> Self {
        self.call(HttpMethod::Delete, name, path, Vec::<String>::new())
    }

    /// 捕获上一步响应的 `id`，供后续步骤以 `{{binding}}` 引用
    pub fn capture(mut self, binding: &str, object: &str) -> Self {
        if let Some(step) = self.steps.last_mut() {
            step.capture = Some(Capture::id(binding, object));
        }
        self
    }

    pub fn build(self) -> Scenario {
        Scenario {
            name: self.name,
            description: self.description,
            steps: self.steps,
        }
    }
}

// ---------------------------------------------------------------------------
// 单元测试
// ---------------------------------------------------------------------------
