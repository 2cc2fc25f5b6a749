use autohost_db::prelude::*;
use sea_orm::EntityTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn idx<E: EntityTrait>(s: &sea_orm::Schema, e: E) -> Vec<IndexCreateStatement> {
    s.create_index_from_entity(e)
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        let s = sea_orm::Schema::new(m.get_database_backend());
        m.create_table(s.create_table_from_entity(Players)).await?;
        m.create_table(s.create_table_from_entity(Matches)).await?;
        m.create_table(s.create_table_from_entity(Frames)).await?;
        m.create_table(s.create_table_from_entity(MatchPlayers))
            .await?;
        let s = &s;
        let all_idx = [
            idx(s, Players),
            idx(s, Matches),
            idx(s, Frames),
            idx(s, MatchPlayers),
        ]
        .into_iter()
        .flatten();
        for i in all_idx {
            m.create_index(i).await?;
        }
        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(Table::drop().table(MatchPlayers).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop match_players"))?;
        m.drop_table(Table::drop().table(Frames).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop frames"))?;
        m.drop_table(Table::drop().table(Matches).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop matches"))?;
        m.drop_table(Table::drop().table(Players).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop players"))?;
        Ok(())
    }
}

fn log_err<'a>(ctx: &'a str) -> impl FnOnce(&DbErr) + 'a {
    move |e| {
        eprintln!("{ctx}: {e}");
    }
}
