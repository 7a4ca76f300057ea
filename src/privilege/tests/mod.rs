//! Тесты для модели привилегий
