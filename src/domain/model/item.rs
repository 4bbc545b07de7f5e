use crate::domain::model::{ItemId, UserId};

/// アイテム
/// 在庫コラボレーターから取得する読み取り専用のビュー
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    owner_id: UserId,
    available: bool,
}

impl Item {
    pub fn new(id: ItemId, owner_id: UserId, available: bool) -> Self {
        Self {
            id,
            owner_id,
            available,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// 所有者のユーザーID
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// 予約を受け付けているか
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// 指定ユーザーが所有者か
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}
