//! Тесты для разрешателя грантов
