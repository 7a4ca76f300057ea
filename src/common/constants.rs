//! Константы для grantplan

/// Версия провайдера, которую синтезатор закрепляет по умолчанию
pub const DEFAULT_VERSION_PIN: &str = "0.64.0";

/// Виды объектов схемы, на которые нельзя ссылаться по идентификатору,
/// если объект участвует в шаре
pub const DEFAULT_SHARES_EXCLUDED_KINDS: &[&str] = &[
    "dynamic_table",
    "file_format",
    "semantic_view",
    "sequence",
    "stage",
    "stream",
    "task",
];

/// Имя неявного окружения, когда поддержка окружений выключена
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// Маркер цели для грантов на весь вид объектов
pub const WILDCARD_TARGET: &str = "*";

/// Разделитель частей идентификатора гранта
pub const GRANT_ID_SEPARATOR: &str = "__";

/// Цель идентификатора гранта на будущие объекты
///
/// `-` с не шестнадцатеричными символами не получается при кодировании имен.
pub const FUTURE_ID_TARGET: &str = "-future";

/// Цель идентификатора гранта на все объекты вида в области
pub const ALL_ID_TARGET: &str = "-all";

/// Маркер адресации по имени (объекты в шаре)
pub const BY_NAME_ID_MARKER: &str = "by_name";

/// Префикс переменных окружения конфигурации
pub const ENV_PREFIX: &str = "GRANTPLAN_";
