use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::mutations::Mutation;
use crate::graphql::queries::Query;

pub type GraphQLSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn build_schema(context: GraphQLContext) -> GraphQLSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(context)
        .finish()
}
