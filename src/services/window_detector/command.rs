use crate::error::Result;
use crate::ksh_error;
use std::collections::HashMap;
use std::process::Command;
use tracing::debug;

/// Переменные окружения пользовательской сессии.
/// Под sudo подставляем шину и runtime-каталог исходного пользователя.
fn build_env_overrides() -> HashMap<String, String> {
    let mut env_vars = HashMap::new();

    if std::env::var("USER").unwrap_or_default() == "root" {
        if let Ok(sudo_user) = std::env::var("SUDO_USER") {
            if let Ok(output) = Command::new("id").args(["-u", sudo_user.as_str()]).output() {
                let uid = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !uid.is_empty() {
                    let runtime_dir = format!("/run/user/{}", uid);
                    debug!("Окружение пользователя {}: uid={}", sudo_user, uid);
                    env_vars.insert(
                        "DBUS_SESSION_BUS_ADDRESS".to_string(),
                        format!("unix:path={}/bus", runtime_dir),
                    );
                    env_vars.insert("XDG_RUNTIME_DIR".to_string(), runtime_dir);
                    env_vars.insert("USER".to_string(), sudo_user);
                }
            }
        }
    }

    if let Ok(display) = std::env::var("DISPLAY") {
        env_vars.insert("DISPLAY".to_string(), display);
    }

    env_vars
}

/// Команда, запускаемая от имени пользователя сессии
pub fn session_command(program: &str, args: &[&str]) -> Command {
    let mut cmd = match std::env::var("SUDO_USER") {
        Ok(sudo_user) => {
            let mut cmd = Command::new("sudo");
            cmd.args(["-E", "-u", sudo_user.as_str(), program]);
            cmd
        }
        Err(_) => Command::new(program),
    };
    cmd.args(args);

    for (key, value) in build_env_overrides() {
        cmd.env(key, value);
    }

    cmd
}

/// Выполнить команду и вернуть stdout без завершающих пробелов
pub fn run_for_stdout(program: &str, args: &[&str]) -> Result<String> {
    let output = session_command(program, args)
        .output()
        .map_err(|e| ksh_error!(window_unavailable, "{} не найден: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("{} {:?} вернул ошибку: {}", program, args, stderr.trim());
        return Err(ksh_error!(window_unavailable, "{} {} вернул ошибку", program, args.join(" ")));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}
