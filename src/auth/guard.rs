//! 路由守卫
//!
//! 路由表：`/login`、`/`（列表）、`/:id`（详情，ID 为正整数）。未登录访问受保护路由
//! 跳转 `/login`，已登录访问 `/login` 跳转 `/`，未知路径跳转 `/`。

use crate::models::RecordId;

/// 可渲染的路由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Detail(RecordId),
}

/// 导航结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(&'static str),
}

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// 解析一次导航（只走一跳）
pub fn resolve(path: &str, authenticated: bool) -> Navigation {
    let trimmed = path.trim();
    let normalized = trimmed.trim_end_matches('/');

    match normalized {
        "" => protect(Route::Home, authenticated),
        "/login" if authenticated => Navigation::Redirect(HOME_PATH),
        "/login" => Navigation::Render(Route::Login),
        other => match other
            .strip_prefix('/')
            .filter(|seg| !seg.contains('/'))
            .and_then(|seg| seg.parse::<RecordId>().ok())
            .filter(|id| *id > 0)
        {
            Some(id) => protect(Route::Detail(id), authenticated),
            None => Navigation::Redirect(HOME_PATH),
        },
    }
}

/// 一直跟随跳转直到得到可渲染的路由
pub fn follow(path: &str, authenticated: bool) -> Route {
    let mut current = path;
    // 路由表最多两跳（未知路径 → `/` → `/login`）
    for _ in 0..4 {
        match resolve(current, authenticated) {
            Navigation::Render(route) => return route,
            Navigation::Redirect(next) => current = next,
        }
    }
    if authenticated {
        Route::Home
    } else {
        Route::Login
    }
}

fn protect(route: Route, authenticated: bool) -> Navigation {
    if authenticated {
        Navigation::Render(route)
    } else {
        Navigation::Redirect(LOGIN_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_home_redirects_to_login() {
        assert_eq!(resolve("/", false), Navigation::Redirect("/login"));
        assert_eq!(follow("/", false), Route::Login);
    }

    #[test]
    fn authenticated_login_redirects_home() {
        assert_eq!(resolve("/login", true), Navigation::Redirect("/"));
        assert_eq!(follow("/login/", true), Route::Home);
    }

    #[test]
    fn detail_requires_numeric_id() {
        assert_eq!(resolve("/17", true), Navigation::Render(Route::Detail(17)));
        assert_eq!(resolve("/17", false), Navigation::Redirect("/login"));
        assert_eq!(resolve("/abc", true), Navigation::Redirect("/"));
    }

    #[test]
    fn non_positive_ids_are_unknown() {
        assert_eq!(resolve("/0", true), Navigation::Redirect("/"));
        assert_eq!(resolve("/-3", true), Navigation::Redirect("/"));
        assert_eq!(follow("/0", false), Route::Login);
    }

    #[test]
    fn unknown_paths_fall_back_home() {
        assert_eq!(resolve("/settings/profile", true), Navigation::Redirect("/"));
        assert_eq!(follow("/settings/profile", true), Route::Home);
        assert_eq!(follow("/settings/profile", false), Route::Login);
    }
}
