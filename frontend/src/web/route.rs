//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、每条路由的角色规则以及守卫判定。

use std::fmt::Display;

use metro_shared::{OAUTH_CALLBACK_PATH, Role};

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 默认落地页
    #[default]
    Home,
    Login,
    OAuthCallback,
    /// 后端故障页（携带错误码）
    ServerError,
    NotFound,
    AdminDashboard,
    Staff,
    Statistics,
    Lines,
    Stations,
    OperatorDashboard,
    TicketAgentDashboard,
    Tickets,
    Passengers,
    Profile,
}

/// 路由守卫规则
///
/// 在路由注册时静态定义，永不修改。空集合表示任何已认证用户均可访问。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub allowed_roles: &'static [Role],
}

const ADMINS: &[Role] = &[Role::Admin, Role::MasterAdmin];
const NETWORK_EDITORS: &[Role] = &[Role::Admin, Role::MasterAdmin, Role::Operator];
const OPERATORS: &[Role] = &[Role::Operator];
const TICKET_AGENTS: &[Role] = &[Role::TicketAgent];
const TICKET_DESK: &[Role] = &[Role::TicketAgent, Role::Admin, Role::MasterAdmin];
const ANY_AUTHENTICATED: &[Role] = &[];

impl RouteRule {
    pub const fn new(allowed_roles: &'static [Role]) -> Self {
        Self { allowed_roles }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.allowed_roles.is_empty() || self.allowed_roles.contains(&role)
    }
}

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    RedirectToLogin,
    RedirectToLanding,
}

/// **核心守卫逻辑**
///
/// 1. 未认证 → 登录页（无论规则为何）
/// 2. 已认证但角色不在允许集合中 → 落地页
/// 3. 其余 → 渲染
pub fn guard(is_authenticated: bool, role: Role, rule: &RouteRule) -> GuardDecision {
    if !is_authenticated {
        GuardDecision::RedirectToLogin
    } else if !rule.permits(role) {
        GuardDecision::RedirectToLanding
    } else {
        GuardDecision::Render
    }
}

/// 登录成功后按角色跳转的目标
///
/// 密码登录、OAuth 回调、错误页“返回首页”共用此映射。
pub fn landing_route(role: Role) -> AppRoute {
    match role {
        Role::Admin | Role::MasterAdmin => AppRoute::AdminDashboard,
        Role::Operator => AppRoute::OperatorDashboard,
        Role::TicketAgent => AppRoute::TicketAgentDashboard,
        Role::Passenger | Role::Guest => AppRoute::Login,
    }
}

/// 重定向原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// 未认证访问受保护页面
    Unauthenticated,
    /// 已认证但角色无权访问
    Forbidden,
    /// 已认证用户访问登录页
    AlreadyAuthenticated,
}

/// 一次导航的最终去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(AppRoute),
    Redirect { to: AppRoute, reason: RedirectReason },
}

impl Navigation {
    /// 最终渲染的路由
    pub fn destination(&self) -> AppRoute {
        match *self {
            Self::Render(route) => route,
            Self::Redirect { to, .. } => to,
        }
    }

    /// 是否为本次导航新增历史记录；被拦下的地址只做替换
    pub fn pushes_history(&self) -> bool {
        matches!(self, Self::Render(_))
    }

    /// 守卫拦下了未认证访问，需要让会话过期
    pub fn should_expire(&self) -> bool {
        matches!(
            self,
            Self::Redirect {
                reason: RedirectReason::Unauthenticated,
                ..
            }
        )
    }
}

/// 结合路由规则与会话状态，计算导航去向
pub fn resolve(target: AppRoute, is_authenticated: bool, role: Role) -> Navigation {
    if let Some(rule) = target.rule() {
        return match guard(is_authenticated, role, &rule) {
            GuardDecision::Render => Navigation::Render(target),
            GuardDecision::RedirectToLogin => Navigation::Redirect {
                to: AppRoute::auth_failure_redirect(),
                reason: RedirectReason::Unauthenticated,
            },
            GuardDecision::RedirectToLanding => Navigation::Redirect {
                to: AppRoute::forbidden_redirect(),
                reason: RedirectReason::Forbidden,
            },
        };
    }

    if is_authenticated && target.should_redirect_when_authenticated() {
        let landing = landing_route(role);
        if landing != target {
            return Navigation::Redirect {
                to: landing,
                reason: RedirectReason::AlreadyAuthenticated,
            };
        }
    }

    Navigation::Render(target)
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 忽略查询串与末尾的 `/`。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/" => Self::Home,
            "/login" => Self::Login,
            OAUTH_CALLBACK_PATH => Self::OAuthCallback,
            "/error" => Self::ServerError,
            "/admin" => Self::AdminDashboard,
            "/admin/staff" => Self::Staff,
            "/admin/statistics" => Self::Statistics,
            "/admin/lines" => Self::Lines,
            "/admin/stations" => Self::Stations,
            "/operator" => Self::OperatorDashboard,
            "/agent" => Self::TicketAgentDashboard,
            "/agent/tickets" => Self::Tickets,
            "/agent/passengers" => Self::Passengers,
            "/profile" => Self::Profile,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::OAuthCallback => OAUTH_CALLBACK_PATH,
            Self::ServerError => "/error",
            Self::NotFound => "/404",
            Self::AdminDashboard => "/admin",
            Self::Staff => "/admin/staff",
            Self::Statistics => "/admin/statistics",
            Self::Lines => "/admin/lines",
            Self::Stations => "/admin/stations",
            Self::OperatorDashboard => "/operator",
            Self::TicketAgentDashboard => "/agent",
            Self::Tickets => "/agent/tickets",
            Self::Passengers => "/agent/passengers",
            Self::Profile => "/profile",
        }
    }

    /// 路由的守卫规则；公开页面返回 `None`
    pub fn rule(&self) -> Option<RouteRule> {
        let roles = match self {
            Self::Home | Self::Login | Self::OAuthCallback | Self::ServerError | Self::NotFound => {
                return None;
            }
            Self::AdminDashboard | Self::Staff | Self::Statistics => ADMINS,
            Self::Lines | Self::Stations => NETWORK_EDITORS,
            Self::OperatorDashboard => OPERATORS,
            Self::TicketAgentDashboard => TICKET_AGENTS,
            Self::Tickets | Self::Passengers => TICKET_DESK,
            Self::Profile => ANY_AUTHENTICATED,
        };
        Some(RouteRule::new(roles))
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    pub fn forbidden_redirect() -> Self {
        Self::Home
    }

    /// 导航栏标题
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "首页",
            Self::Login => "登录",
            Self::OAuthCallback => "第三方登录",
            Self::ServerError => "服务异常",
            Self::NotFound => "页面未找到",
            Self::AdminDashboard => "管理概览",
            Self::Staff => "员工管理",
            Self::Statistics => "运营统计",
            Self::Lines => "线路管理",
            Self::Stations => "站点管理",
            Self::OperatorDashboard => "调度概览",
            Self::TicketAgentDashboard => "售票概览",
            Self::Tickets => "票务管理",
            Self::Passengers => "乘客管理",
            Self::Profile => "个人信息",
        }
    }

    /// 某角色在导航栏中可见的页面
    pub fn nav_items(role: Role) -> Vec<AppRoute> {
        const MENU: [AppRoute; 10] = [
            AppRoute::AdminDashboard,
            AppRoute::OperatorDashboard,
            AppRoute::TicketAgentDashboard,
            AppRoute::Lines,
            AppRoute::Stations,
            AppRoute::Tickets,
            AppRoute::Passengers,
            AppRoute::Staff,
            AppRoute::Statistics,
            AppRoute::Profile,
        ];
        MENU.into_iter()
            .filter(|route| route.rule().is_some_and(|rule| rule.permits(role)))
            .collect()
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
