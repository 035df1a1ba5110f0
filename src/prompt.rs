//! Prompt construction for topic generation.
//!
//! Both messages are pure functions of the scenario so identical scenarios always
//! produce identical requests.

/// Number of topics the model is asked for
pub const TOPIC_COUNT: usize = 5;

/// Upper bound on topic length, in characters, stated in the prompt
pub const MAX_TOPIC_CHARS: usize = 20;

/// System instruction for a scenario. The scenario is embedded three times:
/// role framing, task framing and the closing constraint.
pub fn system_prompt(scenario: &str) -> String {
    format!(
        r#"
**角色**：你是一个专业的社交话题生成器，擅长创建适合{scenario}场景的对话话题。

**任务**：基于"{scenario}"场景，生成{TOPIC_COUNT}个有趣且适合的对话话题，确保话题：
1. **有启发性**（能够引发思考和讨论）
2. **积极向上**（避免敏感、负面或争议性的话题）
3. **简洁明了**（每个话题不超过{MAX_TOPIC_CHARS}字）
4. **多样化**（涵盖不同类型的话题，如经历、观点、假设等）

**输出格式**（严格遵循）：
仅输出话题列表，不要有额外的说明或介绍，每个话题占一行，格式如下：
话题1
话题2
话题3
话题4
话题5

**限制规则**：
- 不包含政治、宗教、争议性或敏感话题
- 不包含过于私人或侵犯隐私的问题
- 保持语言积极、友好、包容
- 适合在{scenario}场景中自然地开始对话
"#
    )
}

/// User turn restating the scenario
pub fn user_prompt(scenario: &str) -> String {
    format!("请为\"{scenario}\"场景生成适合的社交话题。")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_embedded_three_times() {
        for scenario in ["约会", "职场破冰", "朋友聚会", "team offsite"] {
            let prompt = system_prompt(scenario);
            assert_eq!(prompt.matches(scenario).count(), 3, "scenario: {scenario}");
        }
    }

    #[test]
    fn test_requests_five_short_topics() {
        let prompt = system_prompt("家庭聚餐");
        assert!(prompt.contains("生成5个"));
        assert!(prompt.contains("不超过20字"));
        for marker in ["话题1", "话题2", "话题3", "话题4", "话题5"] {
            assert!(prompt.contains(marker), "missing {marker}");
        }
        assert!(prompt.contains("不包含政治、宗教"));
        assert!(prompt.contains("不要有额外的说明"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(system_prompt("深度交流"), system_prompt("深度交流"));
    }

    #[test]
    fn test_user_prompt() {
        assert_eq!(user_prompt("约会"), "请为\"约会\"场景生成适合的社交话题。");
    }
}
