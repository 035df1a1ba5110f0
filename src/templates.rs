use crate::models::Template;

/// Scenario gallery. Selecting an entry generates topics for its `name`.
pub static TEMPLATES: [Template; 6] = [
    Template {
        id: "1",
        name: "职场破冰",
        icon: "🏢",
        description: "适合新团队或会议开始时",
    },
    Template {
        id: "2",
        name: "朋友聚会",
        icon: "🎉",
        description: "让聚会更有趣的话题",
    },
    Template {
        id: "3",
        name: "约会对话",
        icon: "💕",
        description: "增进了解的问题",
    },
    Template {
        id: "4",
        name: "家庭聚餐",
        icon: "🍲",
        description: "适合亲人间的交流",
    },
    Template {
        id: "5",
        name: "陌生人社交",
        icon: "👋",
        description: "与新朋友建立联系",
    },
    Template {
        id: "6",
        name: "深度交流",
        icon: "🧠",
        description: "更深入的思考话题",
    },
];

/// 1-based lookup, matching the numbering shown to the user
pub fn by_position(position: usize) -> Option<&'static Template> {
    position.checked_sub(1).and_then(|i| TEMPLATES.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_position() {
        assert_eq!(by_position(1).map(|t| t.name), Some("职场破冰"));
        assert_eq!(by_position(6).map(|t| t.name), Some("深度交流"));
        assert!(by_position(0).is_none());
        assert!(by_position(7).is_none());
    }

    #[test]
    fn test_ids_unique() {
        let mut ids: Vec<_> = TEMPLATES.iter().map(|t| t.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), TEMPLATES.len());
    }
}
