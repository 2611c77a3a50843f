use serde::{Deserialize, Serialize};

pub mod text;

pub use text::SnapshotError;

/// Уникальный идентификатор актёра в сцене
pub type ActorId = uuid::Uuid;

/// Идентификатор группы отменяемых действий (одна логическая операция)
pub type GroupId = uuid::Uuid;

/// Идентификатор сохранённого снимка состояния
pub type StateId = uuid::Uuid;

/// Снимок состояния: JSON-дерево, все листья которого строки
pub type Snapshot = serde_json::Value;

/// Создать новый уникальный идентификатор
pub fn new_id() -> uuid::Uuid {
    uuid::Uuid::new_v4()
}

/// Тип актёра (хранится в снимке как строка "%i")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    Model,
    Camera,
}

impl ActorType {
    pub fn tag(self) -> i32 {
        match self {
            ActorType::Model => 0,
            ActorType::Camera => 1,
        }
    }

    pub fn from_tag(tag: i32) -> Result<Self, SnapshotError> {
        match tag {
            0 => Ok(ActorType::Model),
            1 => Ok(ActorType::Camera),
            _ => Err(SnapshotError::UnknownEntityType {
                kind: "actor",
                tag,
            }),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ActorType::Model => "Model",
            ActorType::Camera => "Camera",
        }
    }
}

/// Тип коллайдера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderType {
    Box,
    Sphere,
}

impl ColliderType {
    pub fn tag(self) -> i32 {
        match self {
            ColliderType::Box => 0,
            ColliderType::Sphere => 1,
        }
    }

    pub fn from_tag(tag: i32) -> Result<Self, SnapshotError> {
        match tag {
            0 => Ok(ColliderType::Box),
            1 => Ok(ColliderType::Sphere),
            _ => Err(SnapshotError::UnknownEntityType {
                kind: "collider",
                tag,
            }),
        }
    }
}

/// Вид редактора (окно просмотра)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    #[default]
    Perspective,
    Top,
    Left,
    Front,
}

impl ViewType {
    /// Все виды в порядке хранения в файле сцены
    pub const ALL: [ViewType; 4] = [
        ViewType::Perspective,
        ViewType::Top,
        ViewType::Left,
        ViewType::Front,
    ];

    pub fn tag(self) -> i32 {
        match self {
            ViewType::Perspective => 0,
            ViewType::Top => 1,
            ViewType::Left => 2,
            ViewType::Front => 3,
        }
    }

    pub fn from_tag(tag: i32) -> Result<Self, SnapshotError> {
        match tag {
            0 => Ok(ViewType::Perspective),
            1 => Ok(ViewType::Top),
            2 => Ok(ViewType::Left),
            3 => Ok(ViewType::Front),
            _ => Err(SnapshotError::UnknownEntityType { kind: "view", tag }),
        }
    }

    /// Индекс вида в массиве видов
    pub fn index(self) -> usize {
        self.tag() as usize
    }
}

/// Ключ ресурса с путём к вершинным данным модели
pub const VERTEX_DATA_PATH: &str = "vertexDataPath";

/// Ключ ресурса с путём к текстуре модели
pub const TEXTURE_DATA_PATH: &str = "textureDataPath";

/// Расширение файла сцены
pub const SCENE_FILE_EXT: &str = "ultra";
