use anyhow::{anyhow, Result};
use contracts::domain::a008_amazon_report::aggregate::AmazonReport;
use contracts::enums::report_status::ReportStatus;
use contracts::enums::report_type::{ReportSource, ReportType};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a008_amazon_report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub asp_id: String,
    pub marketplace_id: String,
    pub source: String,
    pub report_type: String,
    pub report_id: String,
    pub status: String,
    pub document_id: Option<String>,
    pub data_start_date: Date,
    pub data_end_date: Date,
    pub rows_ingested: i64,
    pub processed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for AmazonReport {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self> {
        Ok(AmazonReport {
            source: ReportSource::from_code(&m.source)
                .ok_or_else(|| anyhow!("unknown report source {}", m.source))?,
            report_type: ReportType::from_code(&m.report_type)
                .ok_or_else(|| anyhow!("unknown report type {}", m.report_type))?,
            status: ReportStatus::from_code(&m.status)
                .ok_or_else(|| anyhow!("unknown report status {}", m.status))?,
            id: m.id,
            account_id: m.account_id,
            asp_id: m.asp_id,
            marketplace_id: m.marketplace_id,
            report_id: m.report_id,
            document_id: m.document_id,
            data_start_date: m.data_start_date,
            data_end_date: m.data_end_date,
            rows_ingested: m.rows_ingested,
            processed_at: m.processed_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

fn to_active(report: &AmazonReport) -> ActiveModel {
    ActiveModel {
        id: Set(report.id.clone()),
        account_id: Set(report.account_id.clone()),
        asp_id: Set(report.asp_id.clone()),
        marketplace_id: Set(report.marketplace_id.clone()),
        source: Set(report.source.code().to_string()),
        report_type: Set(report.report_type.code().to_string()),
        report_id: Set(report.report_id.clone()),
        status: Set(report.status.code().to_string()),
        document_id: Set(report.document_id.clone()),
        data_start_date: Set(report.data_start_date),
        data_end_date: Set(report.data_end_date),
        rows_ingested: Set(report.rows_ingested),
        processed_at: Set(report.processed_at),
        created_at: Set(report.created_at),
        updated_at: Set(report.updated_at),
    }
}

/// Insert a new record, or return the stored one when Amazon handed back an
/// already tracked `(source, report_id)`
pub async fn insert(db: &DatabaseConnection, report: &AmazonReport) -> Result<AmazonReport> {
    let existing = Entity::find()
        .filter(Column::Source.eq(report.source.code()))
        .filter(Column::ReportId.eq(&report.report_id))
        .one(db)
        .await?;
    if let Some(model) = existing {
        return model.try_into();
    }
    to_active(report).insert(db).await?;
    Ok(report.clone())
}

pub async fn update(db: &DatabaseConnection, report: &AmazonReport) -> Result<()> {
    to_active(report).update(db).await?;
    Ok(())
}

/// Reports are only visible to the account that requested them
pub async fn get(db: &DatabaseConnection, account_id: &str, id: &str) -> Result<Option<AmazonReport>> {
    let model = Entity::find_by_id(id.to_string())
        .filter(Column::AccountId.eq(account_id))
        .one(db)
        .await?;
    model.map(TryInto::try_into).transpose()
}

pub async fn list(
    db: &DatabaseConnection,
    account_id: &str,
    asp_id: Option<&str>,
    limit: u64,
) -> Result<Vec<AmazonReport>> {
    let mut query = Entity::find().filter(Column::AccountId.eq(account_id));
    if let Some(asp_id) = asp_id.filter(|s| !s.trim().is_empty()) {
        query = query.filter(Column::AspId.eq(asp_id));
    }
    let rows = query
        .order_by_desc(Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?;
    rows.into_iter().map(TryInto::try_into).collect()
}
