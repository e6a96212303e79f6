//! Provider / 模型选择同步
//!
//! 切换 Provider 时，模型跟随新 Provider 的第一个模型；找不到 Provider
//! 或其模型列表为空时保留原模型。自定义模型在切换 Provider 时总是清空。

use sticker_core::models::{find_provider, Provider, Role, RoleSelections};
use tracing::debug;

/// 切换某个槽位的 Provider
///
/// `applicable` 为当前可选列表：校验前是完整目录，校验后是已验证列表。
pub fn on_provider_change(
    selections: &mut RoleSelections,
    role: Role,
    provider_id: &str,
    applicable: &[Provider],
) {
    let selection = selections.get_mut(role);
    selection.provider = provider_id.to_string();
    selection.custom_model_id = None;

    match find_provider(applicable, provider_id).and_then(Provider::first_model) {
        Some(model) => selection.model = model.to_string(),
        None => debug!(
            "[ProviderSync] {} 的 Provider {} 不在可选列表或没有模型，保留模型 {}",
            role, provider_id, selection.model
        ),
    }
}

pub fn select_model(selections: &mut RoleSelections, role: Role, model: &str) {
    selections.get_mut(role).model = model.to_string();
}

/// 设置自定义模型，空白输入视为清除
pub fn set_custom_model(selections: &mut RoleSelections, role: Role, custom_model_id: &str) {
    let trimmed = custom_model_id.trim();
    selections.get_mut(role).custom_model_id = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    };
}
