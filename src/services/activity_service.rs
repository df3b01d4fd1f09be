// src/services/activity_service.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::{AppError, validation_error},
    models::activity::{
        Activity, ActivityFilters, ActivityStatus, ActivityType, LogEntry, LogFilters,
        RelatedRecord, UpdateActivity,
    },
    storage::Collection,
};

#[derive(Clone)]
pub struct ActivityService {
    activities: Collection<Activity>,
    logs: Collection<LogEntry>,
}

impl ActivityService {
    pub fn new(activities: Collection<Activity>, logs: Collection<LogEntry>) -> Self {
        Self { activities, logs }
    }

    pub fn create_activity(
        &self,
        kind: ActivityType,
        title: &str,
        description: &str,
        status: ActivityStatus,
        due_date: Option<DateTime<Utc>>,
        created_by: &str,
        related_to: Option<RelatedRecord>,
    ) -> Result<Activity, AppError> {
        if title.trim().is_empty() {
            return Err(validation_error("title", "required", "O título da atividade é obrigatório."));
        }

        let activity = Activity {
            id: Uuid::new_v4(),
            kind,
            title: title.trim().to_string(),
            description: description.to_string(),
            status,
            due_date,
            created_at: Utc::now(),
            created_by: created_by.to_string(),
            related_to,
        };

        let activity = self.activities.create(activity)?;
        self.record_action(
            "Atividade criada",
            &format!("Nova atividade: {}", activity.title),
            "sistema",
        )?;

        Ok(activity)
    }

    pub fn update_activity(&self, id: Uuid, update: UpdateActivity) -> Result<Activity, AppError> {
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(validation_error("title", "required", "O título da atividade é obrigatório."));
            }
        }

        let activity = self.activities.update_with(id, |activity| {
            if let Some(kind) = update.kind {
                activity.kind = kind;
            }
            if let Some(title) = update.title {
                activity.title = title.trim().to_string();
            }
            if let Some(description) = update.description {
                activity.description = description;
            }
            if let Some(status) = update.status {
                activity.status = status;
            }
            if let Some(due_date) = update.due_date {
                activity.due_date = Some(due_date);
            }
        })?;

        self.record_action(
            "Atividade atualizada",
            &format!("Atividade {} foi atualizada", id),
            "sistema",
        )?;

        Ok(activity)
    }

    /// Diferente das demais coleções, excluir atividade inexistente é erro.
    pub fn delete_activity(&self, id: Uuid) -> Result<(), AppError> {
        let mut activities = self.activities.get_all()?;
        let before = activities.len();
        activities.retain(|a| a.id != id);
        if activities.len() == before {
            return Err(AppError::ActivityNotFound);
        }
        self.activities.save_all(&activities)?;

        self.record_action(
            "Atividade excluída",
            &format!("Atividade {} foi removida", id),
            "sistema",
        )?;

        Ok(())
    }

    /// Lista filtrada, mais recentes primeiro.
    pub fn list_activities(&self, filters: &ActivityFilters) -> Result<Vec<Activity>, AppError> {
        let mut activities = self.activities.get_all()?;

        if let Some(kind) = filters.kind {
            activities.retain(|a| a.kind == kind);
        }
        if let Some(status) = filters.status {
            activities.retain(|a| a.status == status);
        }
        if let Some(start) = filters.start_date {
            activities.retain(|a| a.created_at >= start);
        }
        if let Some(end) = filters.end_date {
            activities.retain(|a| a.created_at <= end);
        }

        activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(activities)
    }

    /// Anota uma ação no log de auditoria. Implantação local, sem
    /// autenticação: usuário e IP são os valores fixos de sempre.
    pub fn record_action(
        &self,
        action: &str,
        details: &str,
        module: &str,
    ) -> Result<LogEntry, AppError> {
        let entry = LogEntry {
            id: Uuid::new_v4(),
            action: action.to_string(),
            details: details.to_string(),
            timestamp: Utc::now(),
            user: "Usuário Atual".to_string(),
            module: module.to_string(),
            ip_address: Some("local".to_string()),
        };

        self.logs.create(entry)
    }

    pub fn list_logs(&self, filters: &LogFilters) -> Result<Vec<LogEntry>, AppError> {
        let mut logs = self.logs.get_all()?;

        if let Some(module) = &filters.module {
            logs.retain(|l| &l.module == module);
        }
        if let Some(user) = &filters.user {
            logs.retain(|l| &l.user == user);
        }
        if let Some(start) = filters.start_date {
            logs.retain(|l| l.timestamp >= start);
        }
        if let Some(end) = filters.end_date {
            logs.retain(|l| l.timestamp <= end);
        }

        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(logs)
    }
}
