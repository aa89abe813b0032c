//! AttendSys - 学校考勤系统后端服务
//!
//! 基于 Actix Web 构建，当前提供教师之间的调课申请流程：
//! 发起申请 → 目标教师接受/拒绝 → 完成并通知管理员。
//!
//! # 架构
//! - `cache`: 缓存层（Moka）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（鉴权网关、调课校验与状态流转、通知分发）
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
