//! Plain-text rendering of the auth card and the dashboard.

use std::fmt;

use crate::controller::{Mode, Screen, ViewState};

pub fn render(state: &ViewState) -> String {
    View(state).to_string()
}

/// `Display` adapter over a `ViewState`.
pub struct View<'a>(pub &'a ViewState);

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.screen() {
            Screen::Auth => auth(f, self.0)?,
            Screen::Dashboard => dashboard(f, self.0)?,
        }
        feedback(f, self.0)
    }
}

fn auth(f: &mut fmt::Formatter<'_>, state: &ViewState) -> fmt::Result {
    let (login, register, submit) = match state.mode {
        Mode::Login => ("[login]", " register ", "login"),
        Mode::Register => (" login ", "[register]", "register"),
    };
    writeln!(f, "== Account demo ==")?;
    writeln!(f, "{login} {register}")?;
    writeln!(f, "username: {}", state.form.username)?;
    writeln!(f, "password: {}", "*".repeat(state.form.password.chars().count()))?;
    writeln!(f, "> submit to {submit}")
}

fn dashboard(f: &mut fmt::Formatter<'_>, state: &ViewState) -> fmt::Result {
    writeln!(f, "== Account console ==")?;
    writeln!(f, "{} | logout", state.current_user)?;
    writeln!(f, "current user: {}", state.current_user)?;
    writeln!(f, "-- System users --")?;
    writeln!(f, "#, username")?;
    for (index, user) in state.users.iter().enumerate() {
        writeln!(f, "{}, {user}", index + 1)?;
    }
    Ok(())
}

fn feedback(f: &mut fmt::Formatter<'_>, state: &ViewState) -> fmt::Result {
    if !state.status.is_empty() {
        writeln!(f, "status: {}", state.status)?;
    }
    if !state.error.is_empty() {
        writeln!(f, "error: {}", state.error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AccountClient;
    use crate::controller::{Controller, DIRECTORY_REFRESHED};
    use crate::http::HttpResponse;
    use crate::types::Credentials;

    #[test]
    fn auth_card_masks_password_and_marks_mode() {
        let state = ViewState {
            mode: Mode::Register,
            form: Credentials::new("alice", "pw1"),
            ..ViewState::default()
        };
        let screen = render(&state);
        assert!(screen.contains("[register]"));
        assert!(screen.contains("username: alice"));
        assert!(screen.contains("password: ***"));
        assert!(!screen.contains("pw1"));
        assert!(!screen.contains("System users"));
    }

    #[test]
    fn dashboard_numbers_rows_from_one() {
        let state = ViewState {
            token: Some("abc".into()),
            users: vec!["alice".into(), "bob".into()],
            current_user: "alice".into(),
            ..ViewState::default()
        };
        let screen = render(&state);
        assert!(screen.contains("current user: alice"));
        assert!(screen.contains("\n1, alice\n"));
        assert!(screen.contains("\n2, bob\n"));
        assert!(!screen.contains("username:"));
    }

    #[test]
    fn feedback_shows_only_non_empty_lines() {
        let state = ViewState {
            error: "invalid credentials".into(),
            ..ViewState::default()
        };
        let screen = render(&state);
        assert!(screen.ends_with("error: invalid credentials\n"));
        assert!(!screen.contains("status:"));
    }

    #[test]
    fn login_then_directory_renders_single_row() {
        let mut controller = Controller::new(AccountClient::new("http://localhost:8080"));
        controller.set_username("alice");
        controller.set_password("pw1");

        let login = controller.submit().unwrap();
        let fetch = controller
            .resolve(login.action, Ok(HttpResponse::new(200, r#"{"token":"abc","message":"ok"}"#)))
            .unwrap();
        assert_eq!(fetch.request.header("authorization"), Some("Bearer abc"));
        let next = controller.resolve(
            fetch.action,
            Ok(HttpResponse::new(200, r#"{"users":[{"username":"alice"}],"me":"alice"}"#)),
        );
        assert!(next.is_none());

        let screen = render(controller.state());
        let rows: Vec<&str> = screen
            .lines()
            .skip_while(|line| *line != "#, username")
            .skip(1)
            .take_while(|line| !line.starts_with("status:") && !line.starts_with("error:"))
            .collect();
        assert_eq!(rows, vec!["1, alice"]);
        assert!(screen.ends_with(&format!("status: {DIRECTORY_REFRESHED}\n")));
    }
}
