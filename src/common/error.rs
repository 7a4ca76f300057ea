//! Обработка ошибок для grantplan

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ошибка отдельной ячейки матрицы доступа
///
/// Такие ошибки не прерывают проход: ячейка пропускается, остальные
/// разрешаются как обычно (если только вызывающий не запросил fail-fast).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellError {
    /// Роль из карты доступа отсутствует в списке функциональных ролей
    #[error("Unknown role '{role}' on {kind} '{object}' in environment '{environment}'")]
    UnknownRole {
        role: String,
        environment: String,
        object: String,
        kind: String,
    },

    /// Окружение из карты доступа отсутствует в списке окружений
    #[error("Unknown environment '{environment}' for role '{role}' on {kind} '{object}'")]
    UnknownEnvironment {
        environment: String,
        role: String,
        object: String,
        kind: String,
    },

    /// Группа объектов ссылается на объект, которого нет в каталоге
    #[error("Schema object group '{group}' references unknown object '{path}'")]
    UnknownObject { group: String, path: String },
}

impl CellError {
    /// Имя объекта каталога, к которому относится ошибка
    pub fn object(&self) -> &str {
        match self {
            CellError::UnknownRole { object, .. } | CellError::UnknownEnvironment { object, .. } => {
                object
            }
            CellError::UnknownObject { group, .. } => group,
        }
    }
}

/// Основной тип ошибки для grantplan
#[derive(Error, Debug)]
pub enum Error {
    /// Ошибка I/O операций
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/десериализации
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Ошибка ячейки матрицы доступа (возвращается только в режиме fail-fast)
    #[error(transparent)]
    Cell(#[from] CellError),

    /// Для вида объекта не определен такой уровень доступа
    #[error("Access level '{level}' is not defined for {kind} (object '{object}')")]
    UnknownAccessLevel {
        kind: String,
        level: String,
        object: String,
    },

    /// Граф зависимостей содержит цикл
    #[error("Dependency cycle between grants: {}", grants.join(" -> "))]
    DependencyCycle { grants: Vec<String> },

    /// Отсутствует родительский грант, а политика запрещает его выводить
    #[error("Grant '{grant}' requires missing parent grant '{parent}'")]
    MissingParentGrant { grant: String, parent: String },

    /// Ошибка валидации
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Ошибка конфигурации
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Тип результата для grantplan
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Создает ошибку неизвестного уровня доступа
    pub fn unknown_access_level(
        kind: impl Into<String>,
        level: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self::UnknownAccessLevel {
            kind: kind.into(),
            level: level.into(),
            object: object.into(),
        }
    }

    /// Создает ошибку цикла зависимостей
    pub fn dependency_cycle(grants: Vec<String>) -> Self {
        Self::DependencyCycle { grants }
    }

    /// Создает ошибку валидации
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Создает ошибку конфигурации
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Фатальна ли ошибка для всего прохода
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Cell(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::configuration(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::configuration(err.to_string())
    }
}
