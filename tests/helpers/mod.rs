// ==========================================
// 集成测试辅助工具
// ==========================================

pub mod api_test_helper;
